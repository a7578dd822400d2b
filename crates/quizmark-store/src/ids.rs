use rand::Rng;

const HEX: &[u8; 16] = b"0123456789abcdef";
const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// Random lowercase hex identifier in `8-4-4-4-12` form.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    let mut id = String::with_capacity(36);
    for (i, len) in GROUPS.iter().enumerate() {
        if i > 0 {
            id.push('-');
        }
        for _ in 0..*len {
            id.push(HEX[rng.random_range(0..16)] as char);
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_id_shape() {
        let id = generate_id();
        let groups: Vec<usize> = id.split('-').map(str::len).collect();
        assert_eq!(groups, vec![8, 4, 4, 4, 12]);
        assert!(id
            .chars()
            .all(|c| c == '-' || c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_ids_differ() {
        assert_ne!(generate_id(), generate_id());
    }
}
