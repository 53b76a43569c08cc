//! Cache keys for catalog lookups

use std::fmt;

/// The catalog call a cache entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Brands,
    Models,
    Years,
    Price,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Brands => "brands",
            Operation::Models => "models",
            Operation::Years => "years",
            Operation::Price => "price",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one memoizable call: the operation and its ordered arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: Operation,
    args: Vec<String>,
}

impl CacheKey {
    pub fn new<I, S>(operation: Operation, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operation,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn brands() -> Self {
        Self::new(Operation::Brands, Vec::<String>::new())
    }

    pub fn models(brand: &str) -> Self {
        Self::new(Operation::Models, [brand])
    }

    pub fn years(brand: &str, model: &str) -> Self {
        Self::new(Operation::Years, [brand, model])
    }

    pub fn price(brand: &str, model: &str, year: &str) -> Self {
        Self::new(Operation::Price, [brand, model, year])
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operation, self.args.join(","))
    }
}
