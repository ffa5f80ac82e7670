//! Per-payload transaction validation
//!
//! Validation is a separate pass from encoding: the codec accepts any
//! structurally valid value, while [`validate_transaction`] reports every
//! semantic violation at once as [`TransactError::Validation`].

use crate::transaction::*;
use crate::{Result, TransactError};

/// Maximum note length in bytes
pub const MAX_NOTE_LEN: usize = 1024;

/// Maximum asset unit name length in bytes
pub const MAX_UNIT_NAME_LEN: usize = 8;

/// Maximum asset name length in bytes
pub const MAX_ASSET_NAME_LEN: usize = 32;

/// Maximum asset URL length in bytes
pub const MAX_ASSET_URL_LEN: usize = 96;

/// Maximum asset decimals
pub const MAX_ASSET_DECIMALS: u32 = 19;

/// Program page size in bytes
pub const PROGRAM_PAGE_SIZE: usize = 2048;

/// Maximum extra program pages
pub const MAX_EXTRA_PROGRAM_PAGES: u32 = 3;

/// Maximum number of application arguments
pub const MAX_APP_ARGS: usize = 16;

/// Maximum combined application argument length in bytes
pub const MAX_APP_TOTAL_ARG_LEN: usize = 2048;

/// Maximum account references
pub const MAX_ACCOUNT_REFERENCES: usize = 4;

/// Maximum application references
pub const MAX_APP_REFERENCES: usize = 8;

/// Maximum asset references
pub const MAX_ASSET_REFERENCES: usize = 8;

/// Maximum box references
pub const MAX_BOX_REFERENCES: usize = 8;

/// Maximum references of all kinds combined
pub const MAX_TOTAL_REFERENCES: usize = 8;

/// Maximum global state schema entries
pub const MAX_GLOBAL_SCHEMA_ENTRIES: u64 = 64;

/// Maximum local state schema entries
pub const MAX_LOCAL_SCHEMA_ENTRIES: u64 = 16;

/// Collects violations under one kind prefix
struct Violations<'a> {
    kind: &'static str,
    errors: &'a mut Vec<String>,
}

impl Violations<'_> {
    fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.errors
                .push(format!("{} validation failed: {}", self.kind, message.into()));
        }
    }
}

/// Validate a transaction, aggregating every violation into one error
pub fn validate_transaction(txn: &Transaction) -> Result<()> {
    let mut errors = Vec::new();

    validate_header(&txn.header, &mut errors);
    match &txn.payload {
        TransactionPayload::Payment(_) => {}
        TransactionPayload::AssetTransfer(fields) => validate_asset_transfer(fields, &mut errors),
        TransactionPayload::AssetConfig(fields) => validate_asset_config(fields, &mut errors),
        TransactionPayload::AssetFreeze(fields) => validate_asset_freeze(fields, &mut errors),
        TransactionPayload::AppCall(fields) => validate_app_call(fields, &mut errors),
        TransactionPayload::KeyRegistration(fields) => {
            validate_key_registration(fields, &mut errors)
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TransactError::Validation { errors })
    }
}

fn validate_header(header: &TransactionHeader, errors: &mut Vec<String>) {
    let mut v = Violations {
        kind: "Transaction",
        errors,
    };
    v.check(
        header.first_valid <= header.last_valid,
        format!(
            "first valid round {} is after last valid round {}",
            header.first_valid, header.last_valid
        ),
    );
    v.check(
        header.note.len() <= MAX_NOTE_LEN,
        format!("note is {} bytes, maximum is {}", header.note.len(), MAX_NOTE_LEN),
    );
}

fn validate_asset_transfer(fields: &AssetTransferFields, errors: &mut Vec<String>) {
    let mut v = Violations {
        kind: "Asset transfer",
        errors,
    };
    v.check(fields.asset_id != 0, "asset id must not be zero");
}

fn validate_asset_freeze(fields: &AssetFreezeFields, errors: &mut Vec<String>) {
    let mut v = Violations {
        kind: "Asset freeze",
        errors,
    };
    v.check(fields.asset_id != 0, "asset id must not be zero");
}

fn validate_asset_config(fields: &AssetConfigFields, errors: &mut Vec<String>) {
    let mut v = Violations {
        kind: "Asset config",
        errors,
    };

    if fields.asset_id == 0 {
        let Some(params) = &fields.params else {
            v.check(false, "asset parameters are required to create an asset");
            return;
        };
        v.check(params.total > 0, "total must be greater than zero");
        v.check(
            params.decimals <= MAX_ASSET_DECIMALS,
            format!("decimals {} exceeds maximum {}", params.decimals, MAX_ASSET_DECIMALS),
        );
        v.check(
            params.unit_name.len() <= MAX_UNIT_NAME_LEN,
            format!("unit name exceeds {} bytes", MAX_UNIT_NAME_LEN),
        );
        v.check(
            params.asset_name.len() <= MAX_ASSET_NAME_LEN,
            format!("asset name exceeds {} bytes", MAX_ASSET_NAME_LEN),
        );
        v.check(
            params.url.len() <= MAX_ASSET_URL_LEN,
            format!("url exceeds {} bytes", MAX_ASSET_URL_LEN),
        );
    } else if let Some(params) = &fields.params {
        // Only the four role addresses may change after creation
        v.check(params.total == 0, "total cannot be changed");
        v.check(params.decimals == 0, "decimals cannot be changed");
        v.check(!params.default_frozen, "default frozen cannot be changed");
        v.check(params.unit_name.is_empty(), "unit name cannot be changed");
        v.check(params.asset_name.is_empty(), "asset name cannot be changed");
        v.check(params.url.is_empty(), "url cannot be changed");
        v.check(params.metadata_hash.is_none(), "metadata hash cannot be changed");
    }
}

fn schema_entries(schema: &Option<StateSchema>) -> u64 {
    schema
        .map(|s| s.num_uints.saturating_add(s.num_byte_slices))
        .unwrap_or(0)
}

fn validate_app_call(fields: &AppCallFields, errors: &mut Vec<String>) {
    let mut v = Violations {
        kind: "App call",
        errors,
    };
    let has_programs = !fields.approval_program.is_empty() || !fields.clear_state_program.is_empty();
    let has_schema = fields.global_state_schema.is_some() || fields.local_state_schema.is_some();

    if fields.app_id == 0 {
        v.check(!fields.approval_program.is_empty(), "approval program is required on create");
        v.check(
            !fields.clear_state_program.is_empty(),
            "clear state program is required on create",
        );
    } else if fields.on_complete == OnApplicationComplete::UpdateApplication {
        v.check(!fields.approval_program.is_empty(), "approval program is required on update");
        v.check(
            !fields.clear_state_program.is_empty(),
            "clear state program is required on update",
        );
        v.check(!has_schema, "state schema cannot be changed on update");
        v.check(fields.extra_program_pages == 0, "extra program pages cannot be changed on update");
    } else {
        v.check(!has_programs, "programs can only be set on create or update");
        v.check(!has_schema, "state schema can only be set on create");
        v.check(fields.extra_program_pages == 0, "extra program pages can only be set on create");
    }

    v.check(
        fields.extra_program_pages <= MAX_EXTRA_PROGRAM_PAGES,
        format!(
            "extra program pages {} exceeds maximum {}",
            fields.extra_program_pages, MAX_EXTRA_PROGRAM_PAGES
        ),
    );
    let max_program_len = PROGRAM_PAGE_SIZE * (1 + fields.extra_program_pages as usize);
    let program_len = fields.approval_program.len() + fields.clear_state_program.len();
    v.check(
        program_len <= max_program_len,
        format!("program size {} exceeds maximum {}", program_len, max_program_len),
    );

    v.check(
        schema_entries(&fields.global_state_schema) <= MAX_GLOBAL_SCHEMA_ENTRIES,
        format!("global state schema exceeds {} entries", MAX_GLOBAL_SCHEMA_ENTRIES),
    );
    v.check(
        schema_entries(&fields.local_state_schema) <= MAX_LOCAL_SCHEMA_ENTRIES,
        format!("local state schema exceeds {} entries", MAX_LOCAL_SCHEMA_ENTRIES),
    );

    v.check(
        fields.args.len() <= MAX_APP_ARGS,
        format!("{} arguments exceeds maximum {}", fields.args.len(), MAX_APP_ARGS),
    );
    let arg_len: usize = fields.args.iter().map(|a| a.len()).sum();
    v.check(
        arg_len <= MAX_APP_TOTAL_ARG_LEN,
        format!("total argument size {} exceeds maximum {}", arg_len, MAX_APP_TOTAL_ARG_LEN),
    );

    v.check(
        fields.account_references.len() <= MAX_ACCOUNT_REFERENCES,
        format!("account references exceed {}", MAX_ACCOUNT_REFERENCES),
    );
    v.check(
        fields.app_references.len() <= MAX_APP_REFERENCES,
        format!("app references exceed {}", MAX_APP_REFERENCES),
    );
    v.check(
        fields.asset_references.len() <= MAX_ASSET_REFERENCES,
        format!("asset references exceed {}", MAX_ASSET_REFERENCES),
    );
    v.check(
        fields.box_references.len() <= MAX_BOX_REFERENCES,
        format!("box references exceed {}", MAX_BOX_REFERENCES),
    );
    let total_refs = fields.account_references.len()
        + fields.app_references.len()
        + fields.asset_references.len()
        + fields.box_references.len();
    v.check(
        total_refs <= MAX_TOTAL_REFERENCES,
        format!("total references {} exceeds maximum {}", total_refs, MAX_TOTAL_REFERENCES),
    );
}

fn validate_key_registration(fields: &KeyRegistrationFields, errors: &mut Vec<String>) {
    let mut v = Violations {
        kind: "Key registration",
        errors,
    };
    if !fields.is_online() {
        // Offline, optionally marking the account non-participating
        return;
    }

    v.check(fields.vote_key.is_some(), "vote key is required");
    v.check(fields.selection_key.is_some(), "selection key is required");
    v.check(fields.state_proof_key.is_some(), "state proof key is required");
    v.check(
        fields.vote_first <= fields.vote_last,
        "vote first must not be greater than vote last",
    );
    v.check(fields.vote_key_dilution != 0, "vote key dilution is required");
    v.check(
        !fields.non_participation,
        "non-participation cannot be set on an online key registration",
    );
}
