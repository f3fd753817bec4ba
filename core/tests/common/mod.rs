//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use ftdh_core::{
    wizard::{
        ActionsTakenForm, BranchCommunicationForm, CaseForm, InitialDataForm,
        MemberBankCommunicationForm,
    },
    DisputeAttributes,
};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

pub fn attributes() -> DisputeAttributes {
    DisputeAttributes {
        ftdh_number: "FTDH-2024-0107".into(),
        sending_bank: "CITY".into(),
        receiving_bank: "EBL".into(),
        sender_account: "2201456789".into(),
        beneficiary_account: "1503009876543".into(),
        stan: 77_120,
        transaction_date: NaiveDate::from_ymd_opt(2024, 4, 20).unwrap(),
        transaction_amount: 48_500.0,
        action_taken: "Debit freeze on beneficiary".into(),
        recovery_amount: None,
        amount_on_hold: Some(48_500.0),
        branch_name: "Gulshan".into(),
        branch_email: "gulshan.ops@city.example".into(),
        member_bank_contact: "Chargeback unit".into(),
        member_bank_email: "chargeback@ebl.example".into(),
        member_bank_reference: Some("EBL/FD/2291".into()),
    }
}

/// A form that passes every wizard step under `EngineConfig::default_test()`.
pub fn valid_form() -> CaseForm {
    CaseForm {
        initial_data: InitialDataForm {
            ftdh_number: "FTDH-2024-0107".into(),
            sending_bank: "CITY".into(),
            receiving_bank: "EBL".into(),
            sender_account: "2201456789".into(),
            beneficiary_account: "1503009876543".into(),
            stan: "077120".into(),
            transaction_date: NaiveDate::from_ymd_opt(2024, 4, 20),
            transaction_amount: Some(48_500.0),
        },
        actions_taken: ActionsTakenForm {
            action_taken: "Debit freeze on beneficiary".into(),
            recovery_amount: Some(12_000.0),
            amount_on_hold: Some(36_500.0),
        },
        branch_communication: BranchCommunicationForm {
            branch_name: "Gulshan".into(),
            branch_email: "gulshan.ops@city.example".into(),
            send_initial_notice: false,
        },
        member_bank_communication: MemberBankCommunicationForm {
            member_bank_contact: "Chargeback unit".into(),
            member_bank_email: "chargeback@ebl.example".into(),
            member_bank_reference: Some("  ".into()),
        },
    }
}
