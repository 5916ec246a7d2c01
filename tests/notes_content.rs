#[macro_use]
mod common;

use actix_web::test;
use serde_json::Value;

use common::*;

#[actix_web::test]
async fn note_list_contains_only_own_notes() {
    let services = services();
    let author = create_user(&services, "user1", "password1").await;
    let other = create_user(&services, "user2", "password2").await;
    let own = create_note(&services, &author, "Note 1", "Note 1 Text").await;
    create_note(&services, &other, "Note 2", "Note 2 Text").await;
    let app = init_app!(services);

    let req = as_user(get("/notes/list/"), &author).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let notes = body["data"]["object_list"].as_array().unwrap();

    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["title"], "Note 1");
    assert_eq!(notes[0]["slug"], own.slug);
    assert_eq!(notes[0]["author_id"], author.user.id.to_hex());
}

#[actix_web::test]
async fn note_list_is_empty_for_a_new_user() {
    let services = services();
    let author = create_user(&services, "user1", "password1").await;
    let newcomer = create_user(&services, "user2", "password2").await;
    create_note(&services, &author, "Note 1", "Note 1 Text").await;
    let app = init_app!(services);

    let req = as_user(get("/notes/list/"), &newcomer).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["object_list"], serde_json::json!([]));
}

#[actix_web::test]
async fn add_and_edit_pages_contain_the_note_form() {
    let services = services();
    let author = create_user(&services, "user1", "password1").await;
    let note = create_note(&services, &author, "Note 1", "Note 1 Text").await;
    let app = init_app!(services);

    let req = as_user(get("/notes/add/"), &author).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["form"]["name"], "NoteForm");
    assert_eq!(body["data"]["form"]["data"]["title"], "");

    let req = as_user(get(&format!("/notes/edit/{}/", note.slug)), &author).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let form = &body["data"]["form"];
    assert_eq!(form["name"], "NoteForm");
    assert_eq!(form["data"]["title"], "Note 1");
    assert_eq!(form["data"]["slug"], note.slug);
}

#[actix_web::test]
async fn detail_and_delete_pages_show_the_note() {
    let services = services();
    let author = create_user(&services, "user1", "password1").await;
    let note = create_note(&services, &author, "Note 1", "Note 1 Text").await;
    let app = init_app!(services);

    for url in [
        format!("/notes/note/{}/", note.slug),
        format!("/notes/delete/{}/", note.slug),
    ] {
        let req = as_user(get(&url), &author).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["note"]["text"], "Note 1 Text", "{}", url);
    }
}

#[actix_web::test]
async fn notes_home_greets_known_users() {
    let services = services();
    let author = create_user(&services, "user1", "password1").await;
    let app = init_app!(services);

    let body: Value = test::call_and_read_body_json(&app, get("/notes/").to_request()).await;
    assert!(body["data"]["username"].is_null());

    let req = as_user(get("/notes/"), &author).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["username"], "user1");
}
