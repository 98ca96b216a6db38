use chrono::Utc;
use rand::Rng;

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 13;

/// `{prefix}_{epochMillis}_{randomBase36}.{extension}`. Uniqueness is not
/// checked against the store.
pub fn generate_file_name(prefix: &str, extension: &str) -> String {
    let timestamp = Utc::now().timestamp_millis();
    format!("{prefix}_{timestamp}_{}.{extension}", random_token())
}

fn random_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| char::from(TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())]))
        .collect()
}
