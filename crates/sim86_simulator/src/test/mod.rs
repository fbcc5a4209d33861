use crate::{Clocks, Flags, Simulator, Step, TraceOptions};
use sim86_instruction::RegisterName;

fn run(code: &[u8]) -> Simulator {
    let mut simulator = Simulator::new(code).unwrap();
    simulator.run().unwrap();
    simulator
}

fn steps(code: &[u8]) -> Vec<Step> {
    let mut simulator = Simulator::new(code).unwrap();
    let mut steps = vec![];
    while let Some(step) = simulator.step().unwrap() {
        steps.push(step);
    }
    steps
}

#[test]
fn mov_then_add() {
    // mov ax, 5
    // add ax, 3
    let simulator = run(&[0xB8, 0x05, 0x00, 0x83, 0xC0, 0x03]);

    let state = simulator.state();
    assert_eq!(state.word(RegisterName::A), 8);
    assert!(!state.flags.contains(Flags::ZERO));
    assert!(!state.flags.contains(Flags::SIGN));
    assert_eq!(state.ip, 6);
}

#[test]
fn sub_self_sets_zero() {
    // mov ax, 5
    // sub ax, ax
    let simulator = run(&[0xB8, 0x05, 0x00, 0x29, 0xC0]);

    assert_eq!(simulator.state().word(RegisterName::A), 0);
    assert_eq!(simulator.state().flags, Flags::ZERO);
}

#[test]
fn negative_result_sets_sign() {
    // mov ax, 1
    // sub ax, 2
    let simulator = run(&[0xB8, 0x01, 0x00, 0x2D, 0x02, 0x00]);

    assert_eq!(simulator.state().word(RegisterName::A), 0xFFFF);
    assert_eq!(simulator.state().flags, Flags::SIGN);
}

#[test]
fn byte_arithmetic_wraps_in_the_low_byte() {
    // mov ax, 0x12FF
    // add al, 1
    let simulator = run(&[0xB8, 0xFF, 0x12, 0x04, 0x01]);

    assert_eq!(simulator.state().word(RegisterName::A), 0x1200);
    assert_eq!(simulator.state().flags, Flags::ZERO);
}

#[test]
fn cmp_only_updates_flags() {
    // mov bx, 5
    // cmp bx, 5
    let simulator = run(&[0xBB, 0x05, 0x00, 0x83, 0xFB, 0x05]);

    assert_eq!(simulator.state().word(RegisterName::B), 5);
    assert_eq!(simulator.state().flags, Flags::ZERO);
}

#[test]
fn jnz_loop() {
    // mov cx, 2
    // label: sub cx, 1
    // jnz label
    let code = [0xB9, 0x02, 0x00, 0x83, 0xE9, 0x01, 0x75, 0xFB];
    let simulator = run(&code);

    assert_eq!(simulator.state().word(RegisterName::C), 0);
    assert_eq!(simulator.state().ip, code.len() as u16);
    assert_eq!(simulator.instructions_executed(), 5);
    assert_eq!(simulator.total_clocks(), 4 + 4 + 16 + 4 + 4);
}

#[test]
fn other_jumps_are_not_taken() {
    // jz $-2 would loop forever if it was executed.
    let simulator = run(&[0x74, 0xFC, 0xB8, 0x01, 0x00]);

    assert_eq!(simulator.state().word(RegisterName::A), 1);
    assert_eq!(simulator.state().ip, 5);
}

#[test]
fn memory_operands() {
    // mov word [1000], 1
    // mov bx, [1000]
    // mov bp, 1000
    // add byte [bp+1], 2
    let code = [
        0xC7, 0x06, 0xE8, 0x03, 0x01, 0x00, //
        0x8B, 0x1E, 0xE8, 0x03, //
        0xBD, 0xE8, 0x03, //
        0x80, 0x46, 0x01, 0x02,
    ];
    let steps = steps(&code);

    let last = steps.last().unwrap();
    assert_eq!(last.after.word(RegisterName::B), 1);
    assert_eq!(last.total_clocks, (10 + 6) + (8 + 6) + 4 + (17 + 9));

    let mut simulator = Simulator::new(&code).unwrap();
    simulator.run().unwrap();
    assert_eq!(simulator.memory().read_u16(1000), 0x0201);
}

#[test]
fn program_is_loaded_at_zero() {
    let code = [0xB8, 0x05, 0x00];
    let simulator = Simulator::new(&code).unwrap();
    assert_eq!(&simulator.memory().as_slice()[..3], &code);
    assert!(!simulator.is_finished());
}

#[test]
fn decode_errors_stop_the_run() {
    let mut simulator = Simulator::new(&[0xB8, 0x05, 0x00, 0x90]).unwrap();
    assert!(simulator.step().unwrap().is_some());
    assert!(matches!(
        simulator.step(),
        Err(crate::Error::Decode(
            sim86_decoder::DecodeError::UnknownOpCode(0x90)
        ))
    ));
}

#[test]
fn truncated_instruction_stops_the_run() {
    // mov ax, 5 with its high immediate byte missing.
    let mut simulator = Simulator::new(&[0xB8, 0x05]).unwrap();
    assert!(matches!(
        simulator.step(),
        Err(crate::Error::Decode(
            sim86_decoder::DecodeError::CouldNotReadExtraBytes
        ))
    ));
    assert_eq!(simulator.state().ip, 0);

    // A complete instruction followed by a cut off one.
    let mut simulator = Simulator::new(&[0xB9, 0x02, 0x00, 0x8B, 0x80, 0x87]).unwrap();
    assert!(simulator.step().unwrap().is_some());
    assert!(matches!(
        simulator.step(),
        Err(crate::Error::Decode(
            sim86_decoder::DecodeError::CouldNotReadExtraBytes
        ))
    ));
}

#[test]
fn encoded_zero_displacement_costs_clocks() {
    // mov ax, [bp]
    let bp = steps(&[0x8B, 0x46, 0x00]);
    assert_eq!(bp[0].clocks, Clocks { base: 8, ea: 9 });

    // mov ax, [bx] encoded with a zero displacement byte.
    let bx_with_byte = steps(&[0x8B, 0x47, 0x00]);
    assert_eq!(bx_with_byte[0].instruction.to_string(), "mov ax, [bx]");
    assert_eq!(bx_with_byte[0].clocks, Clocks { base: 8, ea: 9 });

    // mov ax, [bx] without one.
    let bx = steps(&[0x8B, 0x07]);
    assert_eq!(bx[0].clocks, Clocks { base: 8, ea: 5 });
}

#[test]
fn trace_lines() {
    // mov bx, 1000
    // mov cx, [bx+4]
    // sub bx, bx
    let steps = steps(&[0xBB, 0xE8, 0x03, 0x8B, 0x4F, 0x04, 0x29, 0xDB]);

    let plain = TraceOptions::default();
    let show = TraceOptions {
        show_clocks: true,
        explain_clocks: false,
    };
    let explain = TraceOptions {
        show_clocks: true,
        explain_clocks: true,
    };

    assert_eq!(
        steps[0].trace(plain).to_string(),
        "mov bx, 1000 ; bx:0x0->0x3e8 ip:0x0->0x3"
    );
    assert_eq!(
        steps[0].trace(show).to_string(),
        "mov bx, 1000 ; Clocks: +4 = 4 | bx:0x0->0x3e8 ip:0x0->0x3"
    );
    assert_eq!(
        steps[1].trace(explain).to_string(),
        "mov cx, [bx+4] ; Clocks: +17 = 21 (8 + 9ea) | ip:0x3->0x6"
    );
    assert_eq!(
        steps[2].trace(show).to_string(),
        "sub bx, bx ; Clocks: +3 = 24 | bx:0x3e8->0x0 ip:0x6->0x8 flags:->Z"
    );
}
