use rand::Rng;

pub const CODE_LENGTH: usize = 6;

/// Uniform 6-digit numeric code. The full space 000000..=999999 is used:
/// leading zeros are valid codes.
pub fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{:06}", n)
}
