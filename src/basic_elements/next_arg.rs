use alloy_primitives::{Address, U256};
use anyhow::{Result, bail};

use crate::types::AbiType;

use super::args::Args;

// Lets generic readers decode a method's declared return type into a concrete T.
pub trait NextArg<T> {
    fn next_arg(&mut self, element_type: AbiType) -> Result<T>;
}

impl NextArg<U256> for Args {
    fn next_arg(&mut self, element_type: AbiType) -> Result<U256> {
        if element_type == AbiType::Uint256 {
            self.next_u256()
        } else {
            bail!(
                "Type mismatch: Expected {:?}, but got request for uint256",
                element_type
            );
        }
    }
}

impl NextArg<Address> for Args {
    fn next_arg(&mut self, element_type: AbiType) -> Result<Address> {
        if element_type == AbiType::Address {
            self.next_address()
        } else {
            bail!(
                "Type mismatch: Expected {:?}, but got request for address",
                element_type
            );
        }
    }
}

impl NextArg<bool> for Args {
    fn next_arg(&mut self, element_type: AbiType) -> Result<bool> {
        if element_type == AbiType::Bool {
            self.next_bool()
        } else {
            bail!(
                "Type mismatch: Expected {:?}, but got request for bool",
                element_type
            );
        }
    }
}

impl NextArg<String> for Args {
    fn next_arg(&mut self, element_type: AbiType) -> Result<String> {
        if element_type == AbiType::String {
            self.next_string()
        } else {
            bail!(
                "Type mismatch: Expected {:?}, but got request for String",
                element_type
            );
        }
    }
}
