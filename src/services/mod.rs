pub mod email;
pub mod hashing;
pub mod jwt;
pub mod mfa;
pub mod security;
