#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

mod error;
pub mod types;

pub use error::TypeError;
pub use types::{
    compose, decolor, retrieve_atomic_all, AtomicType, ColoredType, CombinatorType, ComplexType,
    ModalType, WordType,
};
