use crate::{decode_instruction, DecodeError, Decoder};

fn decode(bytes: &[u8]) -> crate::Result<(String, u8)> {
    let mut it = bytes.iter().copied();
    let instruction = decode_instruction(&mut it)?;
    Ok((instruction.to_string(), instruction.size))
}

macro_rules! test_listing {
    ($bytes:expr, $listing:literal) => {{
        let bytes: &[u8] = &$bytes;
        let (text, size) = decode(bytes).unwrap();
        assert_eq!(text, $listing, "{:02X?}", bytes);
        assert_eq!(size as usize, bytes.len(), "{:02X?}", bytes);
    }};
}

#[test]
fn mov_register_to_register() {
    test_listing!([0x89, 0xD9], "mov cx, bx");
    test_listing!([0x88, 0xE5], "mov ch, ah");
    test_listing!([0x89, 0xDE], "mov si, bx");
    test_listing!([0x8B, 0xF3], "mov si, bx");
    test_listing!([0x88, 0xC6], "mov dh, al");
}

#[test]
fn mov_immediate_to_register() {
    test_listing!([0xB8, 0x05, 0x00], "mov ax, 5");
    test_listing!([0xB1, 0x0C], "mov cl, 12");
    test_listing!([0xB5, 0xF4], "mov ch, 244");
    test_listing!([0xBA, 0x6C, 0x0F], "mov dx, 3948");
    test_listing!([0xBA, 0x94, 0xF0], "mov dx, 61588");
}

#[test]
fn mov_memory() {
    test_listing!([0x8A, 0x00], "mov al, [bx+si]");
    test_listing!([0x8B, 0x1B], "mov bx, [bp+di]");
    test_listing!([0x8B, 0x56, 0x00], "mov dx, [bp]");
    test_listing!([0x8A, 0x60, 0x04], "mov ah, [bx+si+4]");
    test_listing!([0x8A, 0x80, 0x87, 0x13], "mov al, [bx+si+4999]");
    test_listing!([0x89, 0x09], "mov [bx+di], cx");
    test_listing!([0x88, 0x0A], "mov [bp+si], cl");
    test_listing!([0x88, 0x6E, 0x00], "mov [bp], ch");
    test_listing!([0x8B, 0x41, 0xDB], "mov ax, [bx+di-37]");
    test_listing!([0x89, 0x8C, 0xD4, 0xFE], "mov [si-300], cx");
    test_listing!([0x8B, 0x57, 0xE0], "mov dx, [bx-32]");
}

#[test]
fn direct_address_is_not_bp() {
    test_listing!([0x8B, 0x2E, 0x05, 0x00], "mov bp, [5]");
    test_listing!([0x8B, 0x1E, 0x82, 0x0D], "mov bx, [3458]");
    test_listing!([0x8B, 0x46, 0x00], "mov ax, [bp]");
}

#[test]
fn mov_immediate_to_memory() {
    test_listing!([0xC6, 0x03, 0x07], "mov [bp+di], byte 7");
    test_listing!([0xC7, 0x85, 0x85, 0x03, 0x5B, 0x01], "mov [di+901], word 347");
}

#[test]
fn mov_accumulator() {
    test_listing!([0xA1, 0xFB, 0x09], "mov ax, [2555]");
    test_listing!([0xA1, 0x10, 0x00], "mov ax, [16]");
    test_listing!([0xA3, 0xFA, 0x09], "mov [2554], ax");
    test_listing!([0xA2, 0x0F, 0x00], "mov [15], al");
}

#[test]
fn arithmetic() {
    test_listing!([0x03, 0x18], "add bx, [bx+si]");
    test_listing!([0x03, 0x5E, 0x00], "add bx, [bp]");
    test_listing!([0x83, 0xC6, 0x02], "add si, 2");
    test_listing!([0x83, 0xC5, 0x02], "add bp, 2");
    test_listing!([0x83, 0xC1, 0x08], "add cx, 8");
    test_listing!([0x02, 0x7A, 0x04], "add bh, [bp+si+4]");
    test_listing!([0x80, 0x07, 0x22], "add [bx], byte 34");
    test_listing!([0x83, 0x82, 0xE8, 0x03, 0x1D], "add [bp+si+1000], word 29");
    test_listing!([0x01, 0xC3], "add bx, ax");
    test_listing!([0x05, 0xE8, 0x03], "add ax, 1000");
    test_listing!([0x04, 0xE2], "add al, 226");
    test_listing!([0x2B, 0x18], "sub bx, [bx+si]");
    test_listing!([0x83, 0xEE, 0x02], "sub si, 2");
    test_listing!([0x80, 0x2F, 0x22], "sub [bx], byte 34");
    test_listing!([0x2D, 0xE8, 0x03], "sub ax, 1000");
    test_listing!([0x3B, 0x18], "cmp bx, [bx+si]");
    test_listing!([0x83, 0xFE, 0x02], "cmp si, 2");
    test_listing!([0x83, 0x3E, 0xE2, 0x12, 0x1D], "cmp [4834], word 29");
    test_listing!([0x3C, 0xE2], "cmp al, 226");
    test_listing!([0x39, 0xD8], "cmp ax, bx");
}

#[test]
fn sign_extended_immediate() {
    test_listing!([0x83, 0xE9, 0x01], "sub cx, 1");
    test_listing!([0x83, 0xC0, 0xFB], "add ax, -5");
    test_listing!([0x81, 0xC0, 0x10, 0x27], "add ax, 10000");
}

#[test]
fn jumps() {
    test_listing!([0x75, 0x02], "jnz $+4");
    test_listing!([0x75, 0xFC], "jnz $-2");
    test_listing!([0x75, 0xFE], "jnz $0");
    test_listing!([0x74, 0xFA], "jz $-4");
    test_listing!([0x7C, 0xF8], "jl $-6");
    test_listing!([0x7E, 0xF6], "jle $-8");
    test_listing!([0x72, 0xF4], "jb $-10");
    test_listing!([0x76, 0xF2], "jbe $-12");
    test_listing!([0x7A, 0xF0], "jp $-14");
    test_listing!([0x70, 0xEE], "jo $-16");
    test_listing!([0x78, 0xEC], "js $-18");
    test_listing!([0x7D, 0xEA], "jnl $-20");
    test_listing!([0x7F, 0xE8], "jnle $-22");
    test_listing!([0x73, 0xE6], "jnb $-24");
    test_listing!([0x77, 0xE4], "jnbe $-26");
    test_listing!([0x7B, 0xE2], "jnp $-28");
    test_listing!([0x71, 0xE0], "jno $-30");
    test_listing!([0x79, 0xDE], "jns $-32");
    test_listing!([0xE2, 0xDC], "loop $-34");
    test_listing!([0xE1, 0xDA], "loopz $-36");
    test_listing!([0xE0, 0xD8], "loopnz $-38");
    test_listing!([0xE3, 0xD6], "jcxz $-40");
}

#[test]
fn empty_input() {
    assert_eq!(decode(&[0_u8; 0]), Err(DecodeError::EndOfInput));
}

#[test]
fn unknown_op_codes() {
    assert_eq!(decode(&[0x90]), Err(DecodeError::UnknownOpCode(0x90)));
    assert_eq!(decode(&[0xF4]), Err(DecodeError::UnknownOpCode(0xF4)));
    assert_eq!(
        decode(&[0x80, 0x0F, 0x22]),
        Err(DecodeError::UnknownExtraOpCode {
            op_code: 0x80,
            extra: 0b001
        })
    );
}

#[test]
fn truncated_instructions() {
    for bytes in [
        &[0xB8, 0x05][..],
        &[0x89],
        &[0x8B, 0x80, 0x87],
        &[0xC7, 0x03, 0x07],
        &[0x75],
        &[0xA1, 0x10],
    ] {
        assert_eq!(
            decode(bytes),
            Err(DecodeError::CouldNotReadExtraBytes),
            "{:02X?}",
            bytes
        );
    }
}

#[test]
fn invalid_encodings() {
    // mov immediate with a register destination or a non-zero reg field.
    assert_eq!(
        decode(&[0xC7, 0xC0, 0x01, 0x00]),
        Err(DecodeError::InvalidEncoding {
            op_code: 0xC7,
            mod_reg_rm: 0xC0
        })
    );
    assert_eq!(
        decode(&[0xC6, 0x0F, 0x01]),
        Err(DecodeError::InvalidEncoding {
            op_code: 0xC6,
            mod_reg_rm: 0x0F
        })
    );
    // Sign extension into a byte operand.
    assert_eq!(
        decode(&[0x82, 0xC0, 0x01]),
        Err(DecodeError::InvalidEncoding {
            op_code: 0x82,
            mod_reg_rm: 0xC0
        })
    );
}

#[test]
fn decoder_walks_the_buffer() {
    let data = [
        0xB9, 0x02, 0x00, // mov cx, 2
        0x83, 0xE9, 0x01, // sub cx, 1
        0x75, 0xFB, // jnz $-3
        0x89, 0x8C, 0xD4, 0xFE, // mov [si-300], cx
    ];

    let decoded = Decoder::new(&data)
        .collect::<crate::Result<Vec<_>>>()
        .unwrap();

    let offsets = decoded.iter().map(|(o, _)| *o).collect::<Vec<_>>();
    assert_eq!(offsets, vec![0, 3, 6, 8]);

    let text = decoded
        .iter()
        .map(|(_, i)| i.to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        text,
        vec!["mov cx, 2", "sub cx, 1", "jnz $-3", "mov [si-300], cx"]
    );

    let total: usize = decoded.iter().map(|(_, i)| i.size as usize).sum();
    assert_eq!(total, data.len());
}

#[test]
fn decoder_stops_after_an_error() {
    let data = [0xB8, 0x05, 0x00, 0x90, 0xB8, 0x05, 0x00];
    let mut decoder = Decoder::new(&data);

    assert!(matches!(decoder.next(), Some(Ok((0, _)))));
    assert_eq!(decoder.next(), Some(Err(DecodeError::UnknownOpCode(0x90))));
    assert_eq!(decoder.next(), None);
}
