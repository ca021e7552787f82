#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use rtti_reflect as reflect;
pub use rtti_utils as utils;
