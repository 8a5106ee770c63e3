//! Selection dialog tests

mod flow;
