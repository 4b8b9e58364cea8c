//! SeaORM entity models
//!
//! One entity per table of the synchronised store

pub mod ability;
pub mod build;
pub mod build_mod;
pub mod companion;
pub mod companion_ability;
pub mod melee_weapon;
pub mod mod_card;
pub mod passive_ability;
pub mod primary_weapon;
pub mod secondary_weapon;
pub mod warframe;

pub use warframe::{
    ActiveModel as WarframeActiveModel, Column as WarframeColumn, Entity as WarframeEntity,
    Model as Warframe,
};

pub use primary_weapon::{
    ActiveModel as PrimaryWeaponActiveModel, Column as PrimaryWeaponColumn,
    Entity as PrimaryWeaponEntity, Model as PrimaryWeapon,
};

pub use secondary_weapon::{
    ActiveModel as SecondaryWeaponActiveModel, Column as SecondaryWeaponColumn,
    Entity as SecondaryWeaponEntity, Model as SecondaryWeapon,
};

pub use melee_weapon::{
    ActiveModel as MeleeWeaponActiveModel, Column as MeleeWeaponColumn,
    Entity as MeleeWeaponEntity, Model as MeleeWeapon,
};

pub use mod_card::{
    ActiveModel as ModActiveModel, Column as ModColumn, Entity as ModEntity, Model as ModCard,
};

pub use companion::{
    ActiveModel as CompanionActiveModel, Column as CompanionColumn, Entity as CompanionEntity,
    Model as Companion,
};

pub use companion_ability::{
    ActiveModel as CompanionAbilityActiveModel, Column as CompanionAbilityColumn,
    Entity as CompanionAbilityEntity, Model as CompanionAbility,
};

pub use ability::{
    ActiveModel as AbilityActiveModel, Column as AbilityColumn, Entity as AbilityEntity,
    Model as Ability,
};

pub use passive_ability::{
    ActiveModel as PassiveAbilityActiveModel, Column as PassiveAbilityColumn,
    Entity as PassiveAbilityEntity, Model as PassiveAbility,
};

pub use build::{
    ActiveModel as BuildActiveModel, Column as BuildColumn, Entity as BuildEntity,
    Model as Build,
};

pub use build_mod::{
    ActiveModel as BuildModActiveModel, Column as BuildModColumn, Entity as BuildModEntity,
    Model as BuildMod,
};
