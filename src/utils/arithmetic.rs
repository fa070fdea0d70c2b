use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

/// Binary operator accepted by [`operation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unsupported operator: {:?}", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Operator::Plus),
            "-" => Ok(Operator::Minus),
            "*" => Ok(Operator::Multiply),
            other => Err(UnknownOperator(other.to_string())),
        }
    }
}

pub fn operation<T>(a: T, b: T, op: Operator) -> T
where
    T: Add<Output = T> + Sub<Output = T> + Mul<Output = T>,
{
    match op {
        Operator::Plus => a + b,
        Operator::Minus => a - b,
        Operator::Multiply => a * b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus() {
        assert_eq!(operation(6, 13, Operator::Plus), 19);
    }

    #[test]
    fn test_minus() {
        assert_eq!(operation(6, 13, Operator::Minus), -7);
    }

    #[test]
    fn test_multiply() {
        assert_eq!(operation(6, 13, Operator::Multiply), 78);
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!("*".parse::<Operator>(), Ok(Operator::Multiply));
        assert_eq!(operation(1.5, 2.0, "+".parse().unwrap()), 3.5);
        assert_eq!(
            "/".parse::<Operator>(),
            Err(UnknownOperator("/".to_string()))
        );
    }
}
