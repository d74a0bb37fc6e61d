//! Identifier helpers shared by the generators and the session store.

use chrono::{DateTime, Utc};
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `len` random lowercase base-36 characters.
pub fn random_base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect()
}

/// `<prefix>_<unix millis>_<suffix>`, or `<prefix>_<unix millis>` for a zero-length suffix.
pub fn timestamped<R: Rng + ?Sized>(
    prefix: &str,
    at: DateTime<Utc>,
    rng: &mut R,
    suffix_len: usize,
) -> String {
    let millis = at.timestamp_millis();
    if suffix_len == 0 {
        format!("{prefix}_{millis}")
    } else {
        format!("{prefix}_{millis}_{}", random_base36(rng, suffix_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_base36_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        let s = random_base36(&mut rng, 64);
        assert_eq!(s.len(), 64);
        assert!(s.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_timestamped_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let id = timestamped("alert", at, &mut rng, 5);
        assert!(id.starts_with("alert_1700000000123_"));
        assert_eq!(id.len(), "alert_1700000000123_".len() + 5);
        assert_eq!(timestamped("tick", at, &mut rng, 0), "tick_1700000000123");
    }
}
