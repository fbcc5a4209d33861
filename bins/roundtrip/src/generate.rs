use byteorder::{LittleEndian, WriteBytesExt};
use rand::Rng;
use std::io::Write;

/// mov, add, sub and cmp in their r/m-with-register form, with d and w cleared.
const REGISTER_OR_MEMORY_OP_CODES: [u8; 4] = [0x88, 0x00, 0x28, 0x38];

/// add, sub and cmp in the reg field of the 0x80..=0x83 group.
const GROUP_EXTRA_OP_CODES: [u8; 3] = [0b000, 0b101, 0b111];

/// add, sub and cmp with an immediate to the accumulator, w cleared.
const ACCUMULATOR_OP_CODES: [u8; 3] = [0x04, 0x2C, 0x3C];

const JUMP_OP_CODES: [u8; 20] = [
    0x74, 0x7C, 0x7E, 0x72, 0x76, 0x7A, 0x70, 0x78, 0x75, 0x7D, 0x7F, 0x73, 0x77, 0x7B, 0x71, 0x79,
    0xE2, 0xE1, 0xE0, 0xE3,
];

/// A word immediate that would be re-assembled into the shorter sign-extended byte form.
fn fits_sign_extended_byte(value: u16) -> bool {
    (-128..=127).contains(&(value as i16))
}

fn wide_immediate(rng: &mut impl Rng) -> u16 {
    loop {
        let value = rng.gen();
        if !fits_sign_extended_byte(value) {
            return value;
        }
    }
}

/// Writes a mod-reg-r/m byte that addresses memory, followed by its displacement. Displacements
/// are always the shortest that can hold them, the same choice an assembler makes.
fn memory_operand(
    rng: &mut impl Rng,
    out: &mut impl Write,
    reg: u8,
    allow_direct: bool,
) -> std::io::Result<()> {
    let mode = rng.gen_range(0..3_u8);
    let rm = loop {
        let rm = rng.gen_range(0..8_u8);
        if mode != 0b00 || rm != 0b110 || allow_direct {
            break rm;
        }
    };

    out.write_u8(mode << 6 | reg << 3 | rm)?;

    match mode {
        0b00 if rm == 0b110 => out.write_u16::<LittleEndian>(rng.gen()),
        0b00 => Ok(()),
        0b01 => {
            // [bp] can only be encoded with a zero displacement.
            let displacement = loop {
                let displacement: i8 = rng.gen();
                if displacement != 0 || rm == 0b110 {
                    break displacement;
                }
            };
            out.write_i8(displacement)
        }
        _ => out.write_i16::<LittleEndian>(wide_immediate(rng) as i16),
    }
}

fn register_or_memory_with_register(
    rng: &mut impl Rng,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let op_code = REGISTER_OR_MEMORY_OP_CODES[rng.gen_range(0..4)] | rng.gen_range(0..2_u8);
    let reg = rng.gen_range(0..8_u8);

    if rng.gen_bool(0.25) {
        // Register to register is assembled with the direction bit cleared.
        out.write_u8(op_code)?;
        return out.write_u8(0b11 << 6 | reg << 3 | rng.gen_range(0..8_u8));
    }

    out.write_u8(op_code | rng.gen_range(0..2_u8) << 1)?;

    // mov between the accumulator and a direct address has its own op codes.
    let allow_direct = op_code & 0xFC != 0x88 || reg != 0;
    memory_operand(rng, out, reg, allow_direct)
}

fn immediate_to_register_or_memory(
    rng: &mut impl Rng,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let extra = GROUP_EXTRA_OP_CODES[rng.gen_range(0..3)];
    let op_code = [0x80, 0x81, 0x83][rng.gen_range(0..3)];

    out.write_u8(op_code)?;
    if rng.gen_bool(0.25) {
        // The accumulator has shorter forms.
        out.write_u8(0b11 << 6 | extra << 3 | rng.gen_range(1..8_u8))?;
    } else {
        memory_operand(rng, out, extra, true)?;
    }

    match op_code {
        0x80 => out.write_u8(rng.gen()),
        0x81 => out.write_u16::<LittleEndian>(wide_immediate(rng)),
        _ => out.write_i8(rng.gen()),
    }
}

fn mov_immediate_to_memory(rng: &mut impl Rng, out: &mut impl Write) -> std::io::Result<()> {
    let wide = rng.gen_bool(0.5);

    out.write_u8(0xC6 | wide as u8)?;
    memory_operand(rng, out, 0b000, true)?;

    if wide {
        out.write_u16::<LittleEndian>(rng.gen())
    } else {
        out.write_u8(rng.gen())
    }
}

fn mov_immediate_to_register(rng: &mut impl Rng, out: &mut impl Write) -> std::io::Result<()> {
    let wide = rng.gen_bool(0.5);

    out.write_u8(0xB0 | (wide as u8) << 3 | rng.gen_range(0..8_u8))?;

    if wide {
        out.write_u16::<LittleEndian>(rng.gen())
    } else {
        out.write_u8(rng.gen())
    }
}

fn mov_accumulator(rng: &mut impl Rng, out: &mut impl Write) -> std::io::Result<()> {
    out.write_u8(0xA0 | rng.gen_range(0..4_u8))?;
    out.write_u16::<LittleEndian>(rng.gen())
}

fn immediate_to_accumulator(rng: &mut impl Rng, out: &mut impl Write) -> std::io::Result<()> {
    let wide = rng.gen_bool(0.5);

    out.write_u8(ACCUMULATOR_OP_CODES[rng.gen_range(0..3)] | wide as u8)?;

    if wide {
        out.write_u16::<LittleEndian>(wide_immediate(rng))
    } else {
        out.write_u8(rng.gen())
    }
}

fn jump(rng: &mut impl Rng, out: &mut impl Write) -> std::io::Result<()> {
    out.write_u8(JUMP_OP_CODES[rng.gen_range(0..JUMP_OP_CODES.len())])?;
    out.write_i8(rng.gen())
}

/// Generates `count` random instructions, each in the encoding an assembler would pick for its
/// listing text.
pub fn generate(rng: &mut impl Rng, count: usize) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(count * 6);

    for _ in 0..count {
        match rng.gen_range(0..7) {
            0 => register_or_memory_with_register(rng, &mut out)?,
            1 => immediate_to_register_or_memory(rng, &mut out)?,
            2 => mov_immediate_to_memory(rng, &mut out)?,
            3 => mov_immediate_to_register(rng, &mut out)?,
            4 => mov_accumulator(rng, &mut out)?,
            5 => immediate_to_accumulator(rng, &mut out)?,
            _ => jump(rng, &mut out)?,
        }
    }

    Ok(out)
}
