/// Length of a CourtListener API token.
const CREDENTIAL_LENGTH: usize = 40;

/// Checks the format of an optional API credential.
///
/// An absent or empty credential is valid, the upstream API accepts anonymous
/// calls at a lower quota. A present one must be exactly 40 lowercase
/// hexadecimal characters.
pub fn validate_credential(credential: Option<&str>) -> bool {
    match credential {
        None | Some("") => true,
        Some(credential) => {
            credential.len() == CREDENTIAL_LENGTH
                && credential.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        }
    }
}
