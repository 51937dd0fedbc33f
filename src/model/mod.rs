pub mod comparison;
pub mod errors;
pub mod method;
pub mod record;
pub mod result;
