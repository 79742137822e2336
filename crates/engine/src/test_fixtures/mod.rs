//! Common characters used across engine tests.

use roster_domain::CharacterData;

/// Level 50 wizard with two items.
pub fn gandalf() -> CharacterData {
    CharacterData::new("Gandalf", "Wizard")
        .with_level(50)
        .with_hp(100)
        .with_mana(200)
        .with_attack(75)
        .with_items(["Staff", "Robe"])
}

/// Level 35 ranger.
pub fn aragorn() -> CharacterData {
    CharacterData::new("Aragorn", "Ranger")
        .with_level(35)
        .with_hp(180)
        .with_mana(20)
        .with_attack(90)
        .with_items(["Anduril"])
}
