use crate::{
    error::{FailureKind, WriteError},
    links::Explorer,
    submitter::{TransactionHandle, TxState},
    types::receipt::TransactionReceipt,
};

/// Where a mined transaction stands against the required confirmation depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptProgress {
    Reverted,
    Confirming { remaining: u64 },
    Confirmed,
}

// The inclusion block counts as the first confirmation
pub fn classify(receipt: &TransactionReceipt, head: u64, confirmations: u64) -> ReceiptProgress {
    if !receipt.succeeded() {
        return ReceiptProgress::Reverted;
    }

    let required = confirmations.max(1);
    let have = if head >= receipt.block() {
        head - receipt.block() + 1
    } else {
        0
    };

    if have >= required {
        ReceiptProgress::Confirmed
    } else {
        ReceiptProgress::Confirming {
            remaining: required - have,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Pending,
    Success,
    Error,
}

/// Screen-specific wording for the in-flight and success states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCopy {
    pub confirming: &'static str,
    pub success: &'static str,
}

pub const AWAITING_APPROVAL: &str = "Waiting for wallet approval...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub tone: StatusTone,
    pub text: String,
    pub explorer_url: Option<String>,
}

/// Status banner for a form's transaction. `None` while idle.
pub fn status_line(
    handle: &TransactionHandle,
    copy: &StatusCopy,
    explorer: &Explorer,
) -> Option<StatusLine> {
    let explorer_url = handle.id.map(|hash| explorer.tx_url(hash));

    let (tone, text) = match handle.state {
        TxState::Idle => return None,
        TxState::AwaitingApproval => (StatusTone::Pending, AWAITING_APPROVAL.to_string()),
        TxState::Submitted | TxState::Confirming => {
            (StatusTone::Pending, copy.confirming.to_string())
        }
        TxState::Confirmed => (StatusTone::Success, copy.success.to_string()),
        TxState::Failed => (
            StatusTone::Error,
            handle
                .error
                .as_ref()
                .map(failure_copy)
                .unwrap_or_else(|| "Transaction failed".to_string()),
        ),
    };

    Some(StatusLine {
        tone,
        text,
        explorer_url,
    })
}

pub fn failure_copy(error: &WriteError) -> String {
    match error.kind() {
        FailureKind::UserRejected => "Transaction rejected in wallet".to_string(),
        FailureKind::InsufficientFunds => "Insufficient funds to pay for gas".to_string(),
        FailureKind::Reverted => "Transaction reverted by the contract".to_string(),
        FailureKind::Timeout => "Timed out waiting for confirmation".to_string(),
        FailureKind::WrongNetwork => "Switch your wallet to Sepolia".to_string(),
        FailureKind::NotConnected => "Connect your wallet first".to_string(),
        FailureKind::Encoding => "Could not build the transaction".to_string(),
        FailureKind::Network => match error {
            WriteError::Network(reason) => format!("Network error: {reason}"),
            _ => "Network error".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{B256, U64};

    use super::*;
    use crate::config::Config;

    const COPY: StatusCopy = StatusCopy {
        confirming: "Transaction confirming...",
        success: "Transfer successful!",
    };

    fn receipt(block: u64, status: u64) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: B256::with_last_byte(1),
            block_number: U64::from(block),
            status: Some(U64::from(status)),
        }
    }

    #[test]
    fn test_classify_counts_inclusion_block() {
        assert_eq!(classify(&receipt(10, 1), 10, 1), ReceiptProgress::Confirmed);
        assert_eq!(
            classify(&receipt(10, 1), 10, 3),
            ReceiptProgress::Confirming { remaining: 2 }
        );
        assert_eq!(classify(&receipt(10, 1), 12, 3), ReceiptProgress::Confirmed);
        // Lagging node
        assert_eq!(
            classify(&receipt(10, 1), 9, 1),
            ReceiptProgress::Confirming { remaining: 1 }
        );
        assert_eq!(classify(&receipt(10, 0), 50, 1), ReceiptProgress::Reverted);
    }

    #[test]
    fn test_status_line_per_state() {
        let explorer = Explorer::from_config(&Config::sepolia());
        let mut handle = TransactionHandle::default();
        assert_eq!(status_line(&handle, &COPY, &explorer), None);

        handle.state = TxState::AwaitingApproval;
        let line = status_line(&handle, &COPY, &explorer).unwrap();
        assert_eq!(line.text, AWAITING_APPROVAL);
        assert_eq!(line.explorer_url, None);

        handle.state = TxState::Confirming;
        handle.id = Some(B256::with_last_byte(9));
        let line = status_line(&handle, &COPY, &explorer).unwrap();
        assert_eq!(line.tone, StatusTone::Pending);
        assert_eq!(line.text, "Transaction confirming...");
        assert!(line.explorer_url.unwrap().starts_with("https://sepolia.etherscan.io/tx/0x"));

        handle.state = TxState::Confirmed;
        let line = status_line(&handle, &COPY, &explorer).unwrap();
        assert_eq!(line.tone, StatusTone::Success);
        assert_eq!(line.text, "Transfer successful!");
    }

    #[test]
    fn test_failure_copy_distinguishes_causes() {
        let rejected = failure_copy(&WriteError::UserRejected("denied".into()));
        let reverted = failure_copy(&WriteError::Reverted {
            hash: B256::ZERO,
        });
        let network = failure_copy(&WriteError::Network("rpc down".into()));

        assert_eq!(rejected, "Transaction rejected in wallet");
        assert_eq!(reverted, "Transaction reverted by the contract");
        assert_eq!(network, "Network error: rpc down");
    }
}
