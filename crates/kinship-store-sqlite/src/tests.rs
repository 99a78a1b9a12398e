//! Integration tests for `SqliteStore` against an in-memory database.

use kinship_core::{
  person::{LifeStatus, MaritalStatus, NewPerson, PersonPatch},
  store::RegistryStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

const ME: &str = "openid-me";
const OTHER: &str = "openid-other";

fn path(segments: &[&str]) -> Vec<String> {
  segments.iter().map(|s| (*s).to_owned()).collect()
}

fn uncle() -> NewPerson { NewPerson::new("mom_bro_1", "舅舅", path(&["妈妈", "哥哥"])) }

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_user_is_idempotent() {
  let s = store().await;

  let first = s.ensure_user(ME.into()).await.unwrap();
  let second = s.ensure_user(ME.into()).await.unwrap();

  assert_eq!(first.openid, ME);
  assert_eq!(first, second, "second login must not recreate the user");
}

// ─── Create / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_person_with_defaults() {
  let s = store().await;

  let created = s.create_person(ME.into(), uncle()).await.unwrap().unwrap();
  assert_eq!(created.openid, ME);
  assert_eq!(created.path_label, "妈妈的哥哥");
  assert_eq!(created.rank, 1);
  assert_eq!(created.status, LifeStatus::Living);
  assert_eq!(created.marital_status, MaritalStatus::Unspecified);
  assert_eq!(created.created_at, created.updated_at);

  let fetched = s
    .get_person(ME.into(), "mom_bro_1".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_roundtrips_every_field() {
  let s = store().await;

  let mut input = uncle();
  input.rank = 2;
  input.status = LifeStatus::Deceased;
  input.marital_status = MaritalStatus::Widowed;
  input.photo_path = "cloud://photos/uncle.jpg".into();
  input.traits = "爱钓鱼".into();
  input.contact = "13800000000".into();
  input.path_label = "二舅".into();

  s.create_person(ME.into(), input.clone()).await.unwrap().unwrap();
  let p = s
    .get_person(ME.into(), input.id.clone())
    .await
    .unwrap()
    .unwrap();

  assert_eq!(p.path, input.path);
  assert_eq!(p.path_label, "二舅");
  assert_eq!(p.rank, 2);
  assert_eq!(p.status, LifeStatus::Deceased);
  assert_eq!(p.marital_status, MaritalStatus::Widowed);
  assert_eq!(p.photo_path, "cloud://photos/uncle.jpg");
  assert_eq!(p.traits, "爱钓鱼");
  assert_eq!(p.contact, "13800000000");
}

#[tokio::test]
async fn duplicate_create_reports_existing_and_keeps_row() {
  let s = store().await;
  s.create_person(ME.into(), uncle()).await.unwrap().unwrap();

  let mut again = uncle();
  again.name = "大舅".into();
  let outcome = s.create_person(ME.into(), again).await.unwrap();
  assert!(outcome.is_none());

  let kept = s
    .get_person(ME.into(), "mom_bro_1".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(kept.name, "舅舅");
}

#[tokio::test]
async fn same_id_under_different_owners() {
  let s = store().await;

  assert!(s.create_person(ME.into(), uncle()).await.unwrap().is_some());
  assert!(s.create_person(OTHER.into(), uncle()).await.unwrap().is_some());
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  let result = s.get_person(ME.into(), "nobody".into()).await.unwrap();
  assert!(result.is_none());
}

// ─── Owner scoping ───────────────────────────────────────────────────────────

#[tokio::test]
async fn other_owner_cannot_see_or_touch_person() {
  let s = store().await;
  s.create_person(ME.into(), uncle()).await.unwrap().unwrap();

  assert!(
    s.get_person(OTHER.into(), "mom_bro_1".into())
      .await
      .unwrap()
      .is_none()
  );
  assert!(s.list_persons(OTHER.into()).await.unwrap().is_empty());

  let patch = PersonPatch { name: Some("hijacked".into()), ..Default::default() };
  assert!(
    s.update_person(OTHER.into(), "mom_bro_1".into(), patch)
      .await
      .unwrap()
      .is_none()
  );
  assert!(!s.delete_person(OTHER.into(), "mom_bro_1".into()).await.unwrap());

  let mine = s
    .get_person(ME.into(), "mom_bro_1".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(mine.name, "舅舅");
}

// ─── List ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_empty_registry() {
  let s = store().await;
  assert!(s.list_persons(ME.into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_in_insertion_order() {
  let s = store().await;
  for id in ["c", "a", "b"] {
    s.create_person(ME.into(), NewPerson::new(id, id, vec![]))
      .await
      .unwrap()
      .unwrap();
  }

  let ids: Vec<_> = s
    .list_persons(ME.into())
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.id)
    .collect();
  assert_eq!(ids, ["c", "a", "b"]);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sparse_update_leaves_absent_fields() {
  let s = store().await;
  let mut input = uncle();
  input.traits = "爱钓鱼".into();
  input.contact = "13800000000".into();
  s.create_person(ME.into(), input).await.unwrap().unwrap();

  let patch = PersonPatch {
    rank: Some(3),
    contact: Some(String::new()),
    ..Default::default()
  };
  let updated = s
    .update_person(ME.into(), "mom_bro_1".into(), patch)
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.rank, 3);
  assert_eq!(updated.contact, "", "present empty string overwrites");
  assert_eq!(updated.traits, "爱钓鱼", "absent field is unchanged");
  assert_eq!(updated.name, "舅舅");
  assert_eq!(updated.path, path(&["妈妈", "哥哥"]));
  assert!(updated.updated_at >= updated.created_at);
}

#[tokio::test]
async fn update_path_keeps_label() {
  let s = store().await;
  s.create_person(ME.into(), uncle()).await.unwrap().unwrap();

  let patch = PersonPatch {
    path: Some(path(&["爸爸", "哥哥"])),
    status: Some(LifeStatus::Deceased),
    marital_status: Some(MaritalStatus::Married),
    ..Default::default()
  };
  let updated = s
    .update_person(ME.into(), "mom_bro_1".into(), patch)
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.path, path(&["爸爸", "哥哥"]));
  assert_eq!(updated.path_label, "妈妈的哥哥");
  assert_eq!(updated.status, LifeStatus::Deceased);
  assert_eq!(updated.marital_status, MaritalStatus::Married);
}

#[tokio::test]
async fn empty_patch_returns_row_unchanged() {
  let s = store().await;
  let created = s.create_person(ME.into(), uncle()).await.unwrap().unwrap();

  let same = s
    .update_person(ME.into(), "mom_bro_1".into(), PersonPatch::default())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(same, created);
}

#[tokio::test]
async fn update_missing_returns_none() {
  let s = store().await;
  let patch = PersonPatch { name: Some("x".into()), ..Default::default() };
  let result = s
    .update_person(ME.into(), "nobody".into(), patch)
    .await
    .unwrap();
  assert!(result.is_none());
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_exactly_one() {
  let s = store().await;
  s.create_person(ME.into(), uncle()).await.unwrap().unwrap();
  s.create_person(ME.into(), NewPerson::new("dad", "爸爸", path(&["爸爸"])))
    .await
    .unwrap()
    .unwrap();

  assert!(s.delete_person(ME.into(), "mom_bro_1".into()).await.unwrap());
  assert!(!s.delete_person(ME.into(), "mom_bro_1".into()).await.unwrap());

  let left = s.list_persons(ME.into()).await.unwrap();
  assert_eq!(left.len(), 1);
  assert_eq!(left[0].id, "dad");
}

// ─── Replace ─────────────────────────────────────────────────────────────────

fn family() -> Vec<NewPerson> {
  vec![
    NewPerson::new("dad", "爸爸", path(&["爸爸"])),
    NewPerson::new("mom", "妈妈", path(&["妈妈"])),
    uncle(),
  ]
}

#[tokio::test]
async fn replace_swaps_whole_registry_in_order() {
  let s = store().await;
  s.create_person(ME.into(), NewPerson::new("old", "旧", vec![]))
    .await
    .unwrap()
    .unwrap();
  s.create_person(OTHER.into(), uncle()).await.unwrap().unwrap();

  let replaced = s.replace_persons(ME.into(), family()).await.unwrap();
  let ids: Vec<_> = replaced.iter().map(|p| p.id.as_str()).collect();
  assert_eq!(ids, ["dad", "mom", "mom_bro_1"]);

  let listed = s.list_persons(ME.into()).await.unwrap();
  assert_eq!(listed, replaced);

  // Other owners are untouched.
  assert_eq!(s.list_persons(OTHER.into()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn replace_twice_is_idempotent() {
  let s = store().await;

  let first = s.replace_persons(ME.into(), family()).await.unwrap();
  let second = s.replace_persons(ME.into(), family()).await.unwrap();

  let key = |ps: &[kinship_core::person::Person]| {
    ps.iter()
      .map(|p| (p.id.clone(), p.name.clone(), p.path.clone()))
      .collect::<Vec<_>>()
  };
  assert_eq!(key(&first), key(&second));
  assert_eq!(s.list_persons(ME.into()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn replace_with_empty_list_clears() {
  let s = store().await;
  s.replace_persons(ME.into(), family()).await.unwrap();

  let replaced = s.replace_persons(ME.into(), vec![]).await.unwrap();
  assert!(replaced.is_empty());
  assert!(s.list_persons(ME.into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_replace_keeps_previous_registry() {
  let s = store().await;
  s.replace_persons(ME.into(), family()).await.unwrap();

  // The second "dad" violates the primary key halfway through the inserts.
  let broken = vec![
    NewPerson::new("dad", "爸爸", vec![]),
    NewPerson::new("dad", "又是爸爸", vec![]),
  ];
  assert!(s.replace_persons(ME.into(), broken).await.is_err());

  let ids: Vec<_> = s
    .list_persons(ME.into())
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.id)
    .collect();
  assert_eq!(ids, ["dad", "mom", "mom_bro_1"]);
}

// ─── Counter ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn counter_increment_and_clear() {
  let s = store().await;
  assert_eq!(s.counter_total().await.unwrap(), 0);

  s.increment_counter().await.unwrap();
  s.increment_counter().await.unwrap();
  assert_eq!(s.counter_total().await.unwrap(), 2);

  s.clear_counter().await.unwrap();
  assert_eq!(s.counter_total().await.unwrap(), 0);

  s.increment_counter().await.unwrap();
  assert_eq!(s.counter_total().await.unwrap(), 1);
}
