pub fn to_hex(data: &[u8]) -> String {
    return data.iter().map(|e| format!("{:02X}", e)).collect::<Vec<_>>().join(" ");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex() {
        let s = to_hex(&[0x6A, 0x04, 0x00, 0x02, 0x50, 0x01]);
        assert_eq!(s, "6A 04 00 02 50 01");
    }
}
