//! Employee identifier generation

use rand::Rng;

use crate::domain::employee::EmployeeId;
use crate::domain::DomainError;

/// Largest supported width; keeps the id space inside `u64`
const MAX_WIDTH: u32 = 18;

/// Generator for fixed-width, zero-padded decimal ids
///
/// A width of 6 gives ids `000000` through `999999`.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    width: u32,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
        }
    }
}

impl IdGenerator {
    pub const DEFAULT_WIDTH: u32 = 6;

    /// Create a generator for ids of `width` digits
    pub fn new(width: u32) -> Result<Self, DomainError> {
        if width == 0 || width > MAX_WIDTH {
            return Err(DomainError::configuration(format!(
                "Employee id width must be between 1 and {}, got {}",
                MAX_WIDTH, width
            )));
        }

        Ok(Self { width })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of distinct ids this generator can produce
    pub fn capacity(&self) -> u64 {
        10u64.pow(self.width)
    }

    /// Uniformly random position in the id space
    pub fn random_index(&self) -> u64 {
        rand::thread_rng().gen_range(0..self.capacity())
    }

    /// Uniformly random id
    pub fn random(&self) -> EmployeeId {
        self.at(self.random_index())
    }

    /// The id at position `index` (taken modulo the capacity)
    pub fn at(&self, index: u64) -> EmployeeId {
        let value = index % self.capacity();
        EmployeeId::generated(format!("{:0width$}", value, width = self.width as usize))
    }
}
