/// Input for creating a user together with its credit ledger entry.
///
/// `password_hash` is already digested; repositories never see plaintext.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub password_hash: String,
    pub credit: i64,
}
