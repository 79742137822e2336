//! Behaviour every `CharacterRepo` implementation must show.
//!
//! Each adapter's tests hand a fresh, empty store to these functions.

use roster_domain::{CharacterData, CharacterId, CharacterPatch};

use crate::infrastructure::ports::CharacterRepo;
use crate::test_fixtures::{aragorn, gandalf};

/// Ids that no backend will ever have minted in an empty store. They cover
/// every backend's native shape plus a string none of them can parse.
const MISSING_IDS: [&str; 6] = [
    "999999",
    "01",
    "65f000000000000000000000",
    "65F000000000000000000000",
    "00000000-0000-0000-0000-000000000000",
    "does-not-exist",
];

pub(crate) async fn assert_repository_contract(repo: &dyn CharacterRepo) {
    assert!(repo.find_all().await.expect("find_all").is_empty());

    // add assigns an id and keeps every field
    let created = repo.add(&gandalf()).await.expect("add gandalf");
    assert!(!created.id.as_str().is_empty());
    assert_eq!(created.data, gandalf());

    let found = repo
        .find_one(&created.id)
        .await
        .expect("find_one")
        .expect("created character should be found");
    assert_eq!(found.id, created.id);
    assert_eq!(found.data, gandalf());

    // distinct ids per add
    let second = repo.add(&aragorn()).await.expect("add aragorn");
    assert_ne!(second.id, created.id);
    assert_eq!(repo.find_all().await.expect("find_all").len(), 2);
    assert_eq!(repo.count().await.expect("count"), 2);

    // partial update touches only the supplied fields
    let patched = repo
        .partial_update(&created.id, &CharacterPatch::new().with_level(55))
        .await
        .expect("partial_update")
        .expect("patched character");
    assert_eq!(patched.id, created.id);
    assert_eq!(patched.data, gandalf().with_level(55));

    let refetched = repo
        .find_one(&created.id)
        .await
        .expect("find_one after patch")
        .expect("patched character should be found");
    assert_eq!(refetched.data.level, 55);
    assert_eq!(refetched.data.name, "Gandalf");
    assert_eq!(refetched.data.items, gandalf().items);

    let patched_items = repo
        .partial_update(
            &created.id,
            &CharacterPatch::new().with_items(["Glamdring"]).with_hp(90),
        )
        .await
        .expect("partial_update items")
        .expect("patched character");
    assert_eq!(patched_items.data.items, vec!["Glamdring".to_string()]);
    assert_eq!(patched_items.data.hp, 90);
    assert_eq!(patched_items.data.level, 55);
    assert_eq!(patched_items.data.mana, 200);

    // full update replaces every field, including emptying the inventory
    let replacement = CharacterData::new("Gandalf the White", "Wizard")
        .with_level(60)
        .with_hp(150)
        .with_mana(300)
        .with_attack(80);
    let replaced = repo
        .update(&created.id, &replacement)
        .await
        .expect("update")
        .expect("replaced character");
    assert_eq!(replaced.id, created.id);
    assert_eq!(replaced.data, replacement);
    assert_eq!(
        repo.find_one(&created.id)
            .await
            .expect("find_one after update")
            .expect("replaced character should be found")
            .data,
        replacement
    );

    // other records are untouched by all of the above
    let untouched = repo
        .find_one(&second.id)
        .await
        .expect("find_one second")
        .expect("second character should be found");
    assert_eq!(untouched.data, aragorn());

    // unknown ids are reported as absent, never as failures
    let oversized = "a".repeat(3000);
    for raw in MISSING_IDS.into_iter().chain([oversized.as_str()]) {
        let missing = CharacterId::from(raw);
        assert!(repo.find_one(&missing).await.expect("find_one missing").is_none());
        assert!(repo
            .update(&missing, &gandalf())
            .await
            .expect("update missing")
            .is_none());
        assert!(repo
            .partial_update(&missing, &CharacterPatch::new().with_level(2))
            .await
            .expect("partial_update missing")
            .is_none());
        assert!(repo.delete(&missing).await.expect("delete missing").is_none());
    }
    assert_eq!(repo.count().await.expect("count"), 2);

    // other spellings of a stored id name nothing
    for alias in id_spellings(&created.id) {
        assert!(
            repo.find_one(&alias).await.expect("find_one alias").is_none(),
            "{alias} should not resolve to {}",
            created.id
        );
        assert!(repo.delete(&alias).await.expect("delete alias").is_none());
    }
    assert_eq!(repo.count().await.expect("count"), 2);

    // delete returns the removed record; a second delete finds nothing
    let removed = repo
        .delete(&created.id)
        .await
        .expect("delete")
        .expect("deleted character");
    assert_eq!(removed.id, created.id);
    assert_eq!(removed.data, replacement);

    assert!(repo.delete(&created.id).await.expect("second delete").is_none());
    assert!(repo.find_one(&created.id).await.expect("find_one deleted").is_none());

    let remaining = repo.find_all().await.expect("find_all");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second.id);
}

/// Zero-padded and case-changed variants of `id` that differ from it.
fn id_spellings(id: &CharacterId) -> Vec<CharacterId> {
    let raw = id.as_str();
    [
        format!("0{raw}"),
        raw.to_uppercase(),
        raw.to_lowercase(),
    ]
    .into_iter()
    .filter(|spelling| spelling != raw)
    .map(CharacterId::from)
    .collect()
}

pub(crate) async fn assert_example_lookups(repo: &dyn CharacterRepo) {
    repo.add(&gandalf()).await.expect("add gandalf");
    repo.add(&aragorn()).await.expect("add aragorn");
    repo.add(&CharacterData::new("Radagast", "Wizard").with_level(35))
        .await
        .expect("add radagast");

    let wizards = repo.find_by_class("Wizard").await.expect("find_by_class");
    let mut names: Vec<String> = wizards.into_iter().map(|c| c.data.name).collect();
    names.sort();
    assert_eq!(names, vec!["Gandalf", "Radagast"]);

    let level_35 = repo.find_by_level(35).await.expect("find_by_level");
    let mut names: Vec<String> = level_35.into_iter().map(|c| c.data.name).collect();
    names.sort();
    assert_eq!(names, vec!["Aragorn", "Radagast"]);

    assert!(repo.find_by_class("Bard").await.expect("find_by_class").is_empty());
    assert!(repo.find_by_level(99).await.expect("find_by_level").is_empty());
}
