//! Record types flowing through the pipeline
//!
//! - `RawRecord`: untyped upstream JSON object
//! - `ValidatedRecord`: strict shapes accepted by the persistence gateway
//! - `KnownKeys`: parent natural keys a dependent record may reference

mod category;
mod keys;
mod raw;
mod validated;
mod vocab;

pub use category::{EntityCategory, RecordKind};
pub use keys::{KnownKeys, ParentKind};
pub use raw::{field_name, snake_case, RawRecord};
pub use validated::{
    AbilityRecord, BuildKey, BuildModRecord, BuildRecord, CompanionAbilityRecord,
    CompanionRecord, MeleeWeaponRecord, ModRecord, PassiveAbilityRecord, RangedWeaponRecord,
    ValidatedRecord, WarframeRecord,
};
pub use vocab::{Vocabulary, VocabularyFlag, TARGET_TYPES};
