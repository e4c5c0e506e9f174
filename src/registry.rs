//! Static registry of the three deployed BuilderHub contracts.
//!
//! Addresses and interfaces are fixed at compile time. The soulbound
//! ProofOfBuild interface deliberately lists no transfer method, so nothing in
//! the crate can encode one.

use std::fmt;

use alloy_primitives::{Address, Bytes, keccak256};
use anyhow::{Result, bail};

use crate::{
    basic_elements::args::{Args, SELECTOR_SIZE},
    constants::{PROOF_OF_BUILD_ADDRESS, QUORUM_ADDRESS, WINSZN_ADDRESS},
    types::{AbiType, AbiValue, ChainId},
};

pub const BALANCE_OF: &str = "balanceOf";
pub const TRANSFER: &str = "transfer";
pub const DELEGATE: &str = "delegate";
pub const DELEGATES: &str = "delegates";
pub const GET_VOTES: &str = "getVotes";
pub const TOTAL_BUILDS: &str = "totalBuilds";
pub const MINT_MY_BUILD: &str = "mintMyBuild";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutability {
    View,
    NonPayable,
}

/// One callable method of a contract interface.
#[derive(Debug, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: &'static str,
    pub inputs: &'static [AbiType],
    pub outputs: &'static [AbiType],
    pub mutability: Mutability,
}

impl MethodSpec {
    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        let inputs: Vec<&str> = self.inputs.iter().map(AbiType::canonical).collect();
        format!("{}({})", self.name, inputs.join(","))
    }

    pub fn selector(&self) -> [u8; SELECTOR_SIZE] {
        let hash = keccak256(self.signature().as_bytes());
        let mut selector = [0u8; SELECTOR_SIZE];
        selector.copy_from_slice(&hash[..SELECTOR_SIZE]);
        selector
    }

    pub fn is_view(&self) -> bool {
        self.mutability == Mutability::View
    }

    /// Declared type of the first return value, if any.
    pub fn output(&self) -> Option<AbiType> {
        self.outputs.first().copied()
    }
}

const BALANCE_OF_METHOD: MethodSpec = MethodSpec {
    name: BALANCE_OF,
    inputs: &[AbiType::Address],
    outputs: &[AbiType::Uint256],
    mutability: Mutability::View,
};

const TRANSFER_METHOD: MethodSpec = MethodSpec {
    name: TRANSFER,
    inputs: &[AbiType::Address, AbiType::Uint256],
    outputs: &[AbiType::Bool],
    mutability: Mutability::NonPayable,
};

const WINSZN_METHODS: &[MethodSpec] = &[BALANCE_OF_METHOD, TRANSFER_METHOD];

const QUORUM_METHODS: &[MethodSpec] = &[
    BALANCE_OF_METHOD,
    TRANSFER_METHOD,
    MethodSpec {
        name: DELEGATE,
        inputs: &[AbiType::Address],
        outputs: &[],
        mutability: Mutability::NonPayable,
    },
    MethodSpec {
        name: DELEGATES,
        inputs: &[AbiType::Address],
        outputs: &[AbiType::Address],
        mutability: Mutability::View,
    },
    MethodSpec {
        name: GET_VOTES,
        inputs: &[AbiType::Address],
        outputs: &[AbiType::Uint256],
        mutability: Mutability::View,
    },
];

const PROOF_OF_BUILD_METHODS: &[MethodSpec] = &[
    BALANCE_OF_METHOD,
    MethodSpec {
        name: TOTAL_BUILDS,
        inputs: &[],
        outputs: &[AbiType::Uint256],
        mutability: Mutability::View,
    },
    MethodSpec {
        name: MINT_MY_BUILD,
        // projectName, description, githubLink, tokenURI
        inputs: &[
            AbiType::String,
            AbiType::String,
            AbiType::String,
            AbiType::String,
        ],
        outputs: &[AbiType::Uint256],
        mutability: Mutability::NonPayable,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractName {
    WinSzn,
    Quorum,
    ProofOfBuild,
}

impl ContractName {
    pub const ALL: [ContractName; 3] = [
        ContractName::WinSzn,
        ContractName::Quorum,
        ContractName::ProofOfBuild,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContractName::WinSzn => "WinSZN Token",
            ContractName::Quorum => "Quorum Token",
            ContractName::ProofOfBuild => "ProofOfBuild NFT",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ContractName::WinSzn => "WSN",
            ContractName::Quorum => "QUM",
            ContractName::ProofOfBuild => "POB",
        }
    }
}

impl fmt::Display for ContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.symbol())
    }
}

/// Address, interface and network of one deployed contract.
#[derive(Debug, PartialEq, Eq)]
pub struct ContractDescriptor {
    pub name: ContractName,
    pub address: Address,
    pub methods: &'static [MethodSpec],
    pub chain: ChainId,
}

static WINSZN: ContractDescriptor = ContractDescriptor {
    name: ContractName::WinSzn,
    address: WINSZN_ADDRESS,
    methods: WINSZN_METHODS,
    chain: ChainId::Sepolia,
};

static QUORUM: ContractDescriptor = ContractDescriptor {
    name: ContractName::Quorum,
    address: QUORUM_ADDRESS,
    methods: QUORUM_METHODS,
    chain: ChainId::Sepolia,
};

static PROOF_OF_BUILD: ContractDescriptor = ContractDescriptor {
    name: ContractName::ProofOfBuild,
    address: PROOF_OF_BUILD_ADDRESS,
    methods: PROOF_OF_BUILD_METHODS,
    chain: ChainId::Sepolia,
};

/// Looks up a contract by logical name.
pub fn contract(name: ContractName) -> &'static ContractDescriptor {
    match name {
        ContractName::WinSzn => &WINSZN,
        ContractName::Quorum => &QUORUM,
        ContractName::ProofOfBuild => &PROOF_OF_BUILD,
    }
}

pub fn all_contracts() -> impl Iterator<Item = &'static ContractDescriptor> {
    ContractName::ALL.into_iter().map(contract)
}

impl ContractDescriptor {
    pub fn method(&self, name: &str) -> Option<&'static MethodSpec> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// Encodes a call after checking it against the declared interface.
    pub fn encode_call(&self, method: &str, args: &[AbiValue]) -> Result<Bytes> {
        let Some(spec) = self.method(method) else {
            bail!("{} has no method named {}", self.name, method);
        };

        if spec.inputs.len() != args.len() {
            bail!(
                "{} expects {} arguments, got {}",
                spec.signature(),
                spec.inputs.len(),
                args.len()
            );
        }

        let mut encoded = Args::new();
        for (position, (expected, value)) in spec.inputs.iter().zip(args).enumerate() {
            if value.abi_type() != *expected {
                bail!(
                    "{} argument {} must be {}, got {}",
                    spec.signature(),
                    position,
                    expected.canonical(),
                    value.abi_type().canonical()
                );
            }
            encoded.add_value(value);
        }

        Ok(encoded.to_calldata(spec.selector()))
    }
}

/// The two fungible tokens a user can pick between on the Tokens screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Token {
    #[default]
    WinSzn,
    Quorum,
}

impl Token {
    pub const ALL: [Token; 2] = [Token::WinSzn, Token::Quorum];

    pub fn descriptor(&self) -> &'static ContractDescriptor {
        contract(self.contract_name())
    }

    pub fn contract_name(&self) -> ContractName {
        match self {
            Token::WinSzn => ContractName::WinSzn,
            Token::Quorum => ContractName::Quorum,
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.contract_name().symbol()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Token::WinSzn => "WinSZN",
            Token::Quorum => "Quorum",
        }
    }
}
