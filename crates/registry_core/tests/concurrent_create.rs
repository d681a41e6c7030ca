use registry_core::db::open_db;
use registry_core::{EntityRepository, RegistryError, SqliteUserRepository, User};
use std::path::PathBuf;
use std::sync::{Arc, Barrier};
use std::thread;

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Created,
    Duplicate,
}

fn create_from_threads(path: PathBuf, emails: Vec<&'static str>) -> Vec<Outcome> {
    let barrier = Arc::new(Barrier::new(emails.len()));
    let handles: Vec<_> = emails
        .into_iter()
        .enumerate()
        .map(|(index, email)| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut conn = open_db(&path).unwrap();
                let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();
                barrier.wait();
                match repo.create(&User::new(email, &format!("Caller {index}"))) {
                    Ok(()) => Outcome::Created,
                    Err(RegistryError::DuplicateIdentity { .. }) => Outcome::Duplicate,
                    Err(other) => panic!("unexpected error: {other}"),
                }
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect()
}

#[test]
fn concurrent_create_of_same_identity_admits_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.sqlite3");
    drop(open_db(&path).unwrap());

    let outcomes = create_from_threads(
        path.clone(),
        vec!["Same@Example.com", "same@example.com", " SAME@example.COM "],
    );
    assert_eq!(
        outcomes.iter().filter(|o| **o == Outcome::Created).count(),
        1
    );
    assert_eq!(
        outcomes.iter().filter(|o| **o == Outcome::Duplicate).count(),
        2
    );

    let mut conn = open_db(&path).unwrap();
    let repo = SqliteUserRepository::try_new(&mut conn).unwrap();
    assert_eq!(repo.find_all().unwrap().len(), 1);
}

#[test]
fn concurrent_create_of_distinct_identities_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.sqlite3");
    drop(open_db(&path).unwrap());

    let outcomes = create_from_threads(
        path.clone(),
        vec!["a@example.com", "b@example.com", "c@example.com", "d@example.com"],
    );
    assert!(outcomes.iter().all(|o| *o == Outcome::Created));

    let mut conn = open_db(&path).unwrap();
    let repo = SqliteUserRepository::try_new(&mut conn).unwrap();
    assert_eq!(repo.find_all().unwrap().len(), 4);
}
