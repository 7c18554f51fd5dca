//! Mutation sequences against the document store

use vitae_document::{
    CollectionPath, DocumentError, DocumentStore, Experience, ExperiencePatch, Item, ItemPatch,
    MutationError, ProfileField, ResumeData,
};

fn sample_data() -> ResumeData {
    ResumeData::from_json_str(
        r#"{
            "profile": {
                "name": "Elijah Clark",
                "title": "Full Stack Engineer",
                "location": "Albany, NY",
                "email": "elijah@example.com",
                "phone": "+1 555 0100",
                "bio": "Builds web things."
            },
            "experience": [
                { "company": "Maximus", "position": "Software Engineer", "period": "2017 - Present",
                  "achievements": ["Automated provisioning"] },
                { "company": "Conatus", "position": "Founder", "period": "2018 - Present" },
                { "company": "Maximus", "position": "IT PM Senior Analyst", "period": "2015 - 2017" }
            ],
            "skills": {
                "frontend": [{ "name": "JavaScript", "experience": "6 years" }],
                "backend": [{ "name": "Java", "level": 80 }]
            },
            "education": [
                { "school": "SUNY Albany", "degree": "B.S.", "location": "Albany, NY", "period": "2010 - 2014" }
            ],
            "certifications": ["AWS Solutions Architect"],
            "additionalInfo": ["Mentor"]
        }"#,
    )
    .unwrap()
}

#[test]
fn test_remove_middle_item_keeps_neighbour_keys() {
    let mut store = DocumentStore::new("elijah", sample_data());
    let keys: Vec<_> = store
        .current()
        .experience
        .iter()
        .map(|item| item.key.clone())
        .collect();

    store
        .remove_item(CollectionPath::Experience, keys[1].clone())
        .unwrap();

    // The third item keeps its key and can still be edited by it
    store
        .update_item(
            CollectionPath::Experience,
            keys[2].clone(),
            ItemPatch::Experience(ExperiencePatch {
                position: Some("Senior Analyst".to_string()),
                ..Default::default()
            }),
        )
        .unwrap();

    let doc = store.current();
    assert_eq!(doc.experience.len(), 2);
    assert_eq!(doc.experience[0].key, keys[0]);
    assert_eq!(doc.experience[1].key, keys[2]);
    assert_eq!(doc.experience[1].value.position, "Senior Analyst");
    assert_eq!(doc.experience[0].value.position, "Software Engineer");
}

#[test]
fn test_in_flight_edit_against_removed_item() {
    let mut store = DocumentStore::new("elijah", sample_data());
    let target = store.current().experience[0].key.clone();

    store
        .remove_item(CollectionPath::Experience, target.clone())
        .unwrap();
    let version = store.version();
    let before = store.current();

    let result = store.update_item(
        CollectionPath::Experience,
        target,
        ItemPatch::Experience(ExperiencePatch {
            company: Some("Ghost".to_string()),
            ..Default::default()
        }),
    );

    assert!(matches!(
        result,
        Err(DocumentError::Mutation(MutationError::ItemNotFound { .. }))
    ));
    assert_eq!(store.version(), version);
    assert_eq!(*store.current(), *before);
}

#[test]
fn test_appended_keys_are_never_reused() {
    let mut store = DocumentStore::new("elijah", sample_data());

    let first = store
        .append_item(
            CollectionPath::Experience,
            Item::Experience(Experience {
                company: "New Company".to_string(),
                position: "Position".to_string(),
                period: "Present".to_string(),
                ..Default::default()
            }),
        )
        .unwrap()
        .key
        .unwrap();

    store
        .remove_item(CollectionPath::Experience, first.clone())
        .unwrap();

    let second = store
        .append_item(
            CollectionPath::Certifications,
            Item::Text("CKA".to_string()),
        )
        .unwrap()
        .key
        .unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_save_then_reset_round_trip() -> anyhow::Result<()> {
    let mut store = DocumentStore::new("elijah", sample_data());

    store.set_field(ProfileField::Title, "Principal Engineer")?;
    store.mark_saved();
    store.set_field(ProfileField::Link("github".to_string()), "https://github.com/x")?;
    assert!(store.is_dirty());

    let doc = store.reset();
    assert_eq!(doc.profile.title, "Principal Engineer");
    assert!(doc.profile.links.is_empty());
    assert_eq!(doc.to_data().profile.title, "Principal Engineer");
    Ok(())
}

#[test]
fn test_load_from_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("resume.json");
    std::fs::write(&path, serde_json::to_string(&sample_data())?)?;

    let store = DocumentStore::load(&path)?;
    assert_eq!(store.current().profile.name, "Elijah Clark");
    assert_eq!(store.current().skills.len(), 2);
    Ok(())
}

#[test]
fn test_load_rejects_bad_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        DocumentStore::load(&path),
        Err(DocumentError::Json(_))
    ));
}
