pub mod arithmetic;
pub mod decimal;
