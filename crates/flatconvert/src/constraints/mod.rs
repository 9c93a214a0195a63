//! One module per concrete constraint struct, each implementing
//! [`crate::keeper::Constraint`] and [`crate::convert::ConvertRule`].

pub mod abs;
pub mod alldiff;
pub mod complementarity;
pub mod cond;
pub mod count;
pub mod div;
pub mod elementary;
pub mod extremum;
pub mod functional;
pub mod if_then_else;
pub mod indicator;
pub mod linear;
pub mod logical;
pub mod pl;
pub mod quadratic;
pub mod sos;
