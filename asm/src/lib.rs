pub mod assembler;
pub mod encode;
mod error;
pub mod image;
pub mod label;
pub mod msg;
pub mod util;

pub use assembler::{assemble, Assembler};
pub use encode::{encode, operands, Operand};
pub use error::{Error, Field, LineError};
pub use image::{Data, Image, Unit};
pub use label::{Label, Labels};
pub use msg::{Diag, Msg};
