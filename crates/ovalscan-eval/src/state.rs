//! Info test states and their two evaluation entry points
//!
//! An `InfoState` binds comparators to the attributes of a package
//! (`eval_software`) or of the installed OS (`eval_os_version`), evaluates every
//! populated field independently and folds the results with its operator.

use crate::comparator::{Comparator, EvrComparator, ScalarComparator};
use crate::evr::EvrParts;
use crate::operator::Operator;
use ovalscan_core::{Error, OsVersion, Result, Software};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Platform tag of Red Hat Enterprise Linux hosts
pub const RHEL_PLATFORM: &str = "rhel";

/// Package name OS-level name tests are written against
pub const REDHAT_RELEASE: &str = "redhat-release";

/// Fields a state may constrain. Evaluation visits them in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateField {
    Name,
    Arch,
    Epoch,
    Release,
    Version,
    Evr,
    SignatureKeyId,
    ExtendedName,
    FilePath,
}

impl StateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateField::Name => "Name",
            StateField::Arch => "Arch",
            StateField::Epoch => "Epoch",
            StateField::Release => "Release",
            StateField::Version => "Version",
            StateField::Evr => "Evr",
            StateField::SignatureKeyId => "SignatureKeyId",
            StateField::ExtendedName => "ExtendedName",
            StateField::FilePath => "FilePath",
        }
    }

    /// True when the field is read from package records
    pub fn applies_to_software(&self) -> bool {
        !matches!(self, StateField::ExtendedName | StateField::FilePath)
    }
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expected state of a package or OS identity
///
/// Immutable once built and safe to share between threads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "InfoStateDef")]
pub struct InfoState {
    fields: BTreeMap<StateField, Comparator>,
    operator: Operator,
}

impl InfoState {
    /// Create a state builder
    pub fn builder() -> InfoStateBuilder {
        InfoStateBuilder::default()
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Comparator configured for a field, if any
    pub fn get(&self, field: StateField) -> Option<&Comparator> {
        self.fields.get(&field)
    }

    /// Populated fields, in evaluation order
    pub fn fields(&self) -> impl Iterator<Item = StateField> + '_ {
        self.fields.keys().copied()
    }

    /// True when no field is populated
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fails with `EmptyState` unless some field constrains a package
    /// attribute. Holds regardless of how many packages are evaluated.
    pub fn validate_software(&self) -> Result<()> {
        if self.fields().any(|field| field.applies_to_software()) {
            Ok(())
        } else {
            Err(Error::EmptyState)
        }
    }

    /// Evaluate the state against an installed package.
    ///
    /// `SignatureKeyId` always contributes `true`: package signatures are not
    /// collected, and RHEL definitions must still apply to rebuilds such as
    /// CentOS. `ExtendedName` and `FilePath` have no package attribute and are
    /// skipped.
    pub fn eval_software(&self, software: &Software) -> Result<bool> {
        let parts = EvrParts::split(&software.version);
        let mut results = Vec::with_capacity(self.fields.len());

        for (field, comparator) in &self.fields {
            let matched = match field {
                StateField::Name => comparator.eval(&software.name)?,
                StateField::Arch => comparator.eval(&software.arch)?,
                StateField::Epoch => {
                    let epoch = parts.epoch_number(&software.version)?;
                    comparator.eval(&epoch.to_string())?
                }
                StateField::Release => comparator.eval(parts.release_str())?,
                StateField::Version => comparator.eval(parts.version)?,
                StateField::Evr => comparator.eval(&software.version)?,
                StateField::SignatureKeyId => true,
                StateField::ExtendedName | StateField::FilePath => continue,
            };
            results.push(matched);
        }

        self.fold(&results)
    }

    /// Evaluate the state against the installed OS.
    ///
    /// Only `Name` and `Version` apply. On RHEL the name is that of the
    /// release package; elsewhere it is empty. The version is the last
    /// space-separated token of the OS name.
    pub fn eval_os_version(&self, os: &OsVersion) -> Result<bool> {
        let mut results = Vec::with_capacity(2);

        for (field, comparator) in &self.fields {
            let matched = match field {
                StateField::Name => comparator.eval(os_release_name(os))?,
                StateField::Version => comparator.eval(os_version_token(&os.name))?,
                _ => continue,
            };
            results.push(matched);
        }

        self.fold(&results)
    }

    fn fold(&self, results: &[bool]) -> Result<bool> {
        if results.is_empty() {
            return Err(Error::EmptyState);
        }
        Ok(self.operator.eval(results))
    }
}

/// Name an OS identity is matched under
pub fn os_release_name(os: &OsVersion) -> &'static str {
    if os.platform == RHEL_PLATFORM {
        REDHAT_RELEASE
    } else {
        ""
    }
}

/// Version token of a free-text OS name ("CentOS Linux 8" -> "8")
pub fn os_version_token(name: &str) -> &str {
    let name = name.trim();
    match name.rfind(' ') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Builder for constructing an `InfoState`
#[derive(Debug, Default)]
pub struct InfoStateBuilder {
    fields: BTreeMap<StateField, Comparator>,
    operator: Operator,
}

impl InfoStateBuilder {
    fn scalar(mut self, field: StateField, comparator: ScalarComparator) -> Self {
        self.fields.insert(field, Comparator::Scalar(comparator));
        self
    }

    pub fn name(self, comparator: ScalarComparator) -> Self {
        self.scalar(StateField::Name, comparator)
    }

    pub fn arch(self, comparator: ScalarComparator) -> Self {
        self.scalar(StateField::Arch, comparator)
    }

    pub fn epoch(self, comparator: ScalarComparator) -> Self {
        self.scalar(StateField::Epoch, comparator)
    }

    pub fn release(self, comparator: ScalarComparator) -> Self {
        self.scalar(StateField::Release, comparator)
    }

    pub fn version(self, comparator: ScalarComparator) -> Self {
        self.scalar(StateField::Version, comparator)
    }

    pub fn evr(mut self, comparator: EvrComparator) -> Self {
        self.fields.insert(StateField::Evr, Comparator::Evr(comparator));
        self
    }

    pub fn signature_keyid(self, comparator: ScalarComparator) -> Self {
        self.scalar(StateField::SignatureKeyId, comparator)
    }

    pub fn extended_name(self, comparator: ScalarComparator) -> Self {
        self.scalar(StateField::ExtendedName, comparator)
    }

    pub fn file_path(self, comparator: ScalarComparator) -> Self {
        self.scalar(StateField::FilePath, comparator)
    }

    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    pub fn build(self) -> InfoState {
        InfoState {
            fields: self.fields,
            operator: self.operator,
        }
    }
}

/// Serialized layout of a state, one optional key per field
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct InfoStateDef {
    #[serde(rename = "Name", alias = "name", default)]
    name: Option<ScalarComparator>,
    #[serde(rename = "Arch", alias = "arch", default)]
    arch: Option<ScalarComparator>,
    #[serde(rename = "Epoch", alias = "epoch", default)]
    epoch: Option<ScalarComparator>,
    #[serde(rename = "Release", alias = "release", default)]
    release: Option<ScalarComparator>,
    #[serde(rename = "Version", alias = "version", default)]
    version: Option<ScalarComparator>,
    #[serde(rename = "Evr", alias = "evr", default)]
    evr: Option<EvrComparator>,
    #[serde(rename = "SignatureKeyId", alias = "signature_keyid", default)]
    signature_keyid: Option<ScalarComparator>,
    #[serde(rename = "ExtendedName", alias = "extended_name", default)]
    extended_name: Option<ScalarComparator>,
    #[serde(rename = "FilePath", alias = "filepath", default)]
    file_path: Option<ScalarComparator>,
    #[serde(default)]
    operator: Operator,
}

impl From<InfoStateDef> for InfoState {
    fn from(def: InfoStateDef) -> Self {
        let scalars = [
            (StateField::Name, def.name),
            (StateField::Arch, def.arch),
            (StateField::Epoch, def.epoch),
            (StateField::Release, def.release),
            (StateField::Version, def.version),
            (StateField::SignatureKeyId, def.signature_keyid),
            (StateField::ExtendedName, def.extended_name),
            (StateField::FilePath, def.file_path),
        ];

        let mut fields: BTreeMap<StateField, Comparator> = scalars
            .into_iter()
            .filter_map(|(field, c)| c.map(|c| (field, Comparator::Scalar(c))))
            .collect();
        if let Some(evr) = def.evr {
            fields.insert(StateField::Evr, Comparator::Evr(evr));
        }

        InfoState {
            fields,
            operator: def.operator,
        }
    }
}
