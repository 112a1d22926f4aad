/// Case label for an opcode, e.g. `0x0F`.
///
/// Two digits is the minimum width, not a limit: 256 renders as `0x100`.
pub fn label(opcode: usize) -> String {
    format!("0x{opcode:02X}")
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(0, "0x00")]
    #[test_case(9, "0x09")]
    #[test_case(15, "0x0F"; "uppercase digits")]
    #[test_case(16, "0x10")]
    #[test_case(0xcb, "0xCB")]
    #[test_case(255, "0xFF")]
    #[test_case(256, "0x100"; "not truncated past two digits")]
    fn ok(opcode: usize, expected: &str) {
        assert_eq!(expected, label(opcode));
    }
}
