use std::sync::{Arc, LazyLock};

use mongodb::bson::oid::ObjectId;
use regex::Regex;

use crate::middleware::auth::AuthUser;
use crate::middleware::ownership::ensure_owner;
use crate::note::model::{Note, NoteForm, SLUG_MAX_CHARS, SLUG_TAKEN_WARNING, TITLE_MAX_CHARS};
use crate::note::repository::NoteRepository;
use crate::utils::error::CustomError;
use crate::utils::form::{FormErrors, FormOutcome, REQUIRED};
use crate::utils::slug::slugify_truncated;

static SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-\w]+$").unwrap());

const INVALID_SLUG: &str =
    "Enter a valid slug consisting of letters, numbers, underscores or hyphens.";

pub struct NoteService {
    repository: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(repository: Arc<dyn NoteRepository>) -> Self {
        NoteService { repository }
    }

    /// Notes visible to `user`: exactly the ones they wrote.
    pub async fn list_for(&self, user: &AuthUser) -> Result<Vec<Note>, CustomError> {
        self.repository.list_by_author(&user.id).await
    }

    pub async fn get_owned(&self, slug: &str, user: &AuthUser) -> Result<Note, CustomError> {
        let note = self.repository.find_by_slug(slug).await?;
        ensure_owner(note, user, "Note")
    }

    /// Validate the form, filling in the slug from the title when blank.
    async fn clean(
        &self,
        form: &NoteForm,
        except: Option<&ObjectId>,
    ) -> Result<(NoteForm, FormErrors), CustomError> {
        let mut errors = FormErrors::default();
        let title = form.title.trim().to_string();
        let text = form.text.clone();

        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if title.chars().count() > TITLE_MAX_CHARS {
            errors.add(
                "title",
                format!(
                    "Ensure this value has at most {} characters (it has {}).",
                    TITLE_MAX_CHARS,
                    title.chars().count()
                ),
            );
        }

        if text.trim().is_empty() {
            errors.add("text", REQUIRED);
        }

        let given = form.slug.trim();
        let slug = if given.is_empty() {
            slugify_truncated(&title, SLUG_MAX_CHARS)
        } else {
            given.to_string()
        };

        if given.is_empty() && slug.is_empty() {
            // nothing to derive a slug from; a blank title is already reported
            if !title.is_empty() {
                errors.add("slug", INVALID_SLUG);
            }
        } else if !SLUG_PATTERN.is_match(&slug) {
            errors.add("slug", INVALID_SLUG);
        } else if slug.chars().count() > SLUG_MAX_CHARS {
            errors.add(
                "slug",
                format!("Ensure this value has at most {} characters.", SLUG_MAX_CHARS),
            );
        } else if self.repository.slug_taken(&slug, except).await? {
            errors.add("slug", format!("{}{}", slug, SLUG_TAKEN_WARNING));
        }

        Ok((NoteForm { title, text, slug }, errors))
    }

    pub async fn create(
        &self,
        user: &AuthUser,
        form: &NoteForm,
    ) -> Result<FormOutcome<Note>, CustomError> {
        let (cleaned, errors) = self.clean(form, None).await?;
        if !errors.is_empty() {
            return Ok(FormOutcome::Invalid(errors));
        }

        let note = Note {
            id: ObjectId::new(),
            title: cleaned.title,
            text: cleaned.text,
            slug: cleaned.slug,
            author_id: user.id,
        };

        let note = self.repository.insert(note).await?;
        log::info!("note {} created by {}", note.slug, user.id);
        Ok(FormOutcome::Saved(note))
    }

    pub async fn update(
        &self,
        slug: &str,
        user: &AuthUser,
        form: &NoteForm,
    ) -> Result<FormOutcome<Note>, CustomError> {
        let note = self.get_owned(slug, user).await?;

        let (cleaned, errors) = self.clean(form, Some(&note.id)).await?;
        if !errors.is_empty() {
            return Ok(FormOutcome::Invalid(errors));
        }

        let updated = Note {
            title: cleaned.title,
            text: cleaned.text,
            slug: cleaned.slug,
            ..note
        };

        if !self.repository.update(&updated).await? {
            return Err(CustomError::not_found("Note"));
        }

        log::info!("note {} updated by {}", updated.slug, user.id);
        Ok(FormOutcome::Saved(updated))
    }

    pub async fn delete(&self, slug: &str, user: &AuthUser) -> Result<Note, CustomError> {
        let note = self.get_owned(slug, user).await?;

        if !self.repository.delete(&note.id, &user.id).await? {
            return Err(CustomError::not_found("Note"));
        }

        log::info!("note {} deleted by {}", note.slug, user.id);
        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::repository::InMemoryNoteRepository;

    fn service() -> NoteService {
        NoteService::new(Arc::new(InMemoryNoteRepository::default()))
    }

    fn user(name: &str) -> AuthUser {
        AuthUser {
            id: ObjectId::new(),
            username: name.to_string(),
        }
    }

    fn form(title: &str, text: &str, slug: &str) -> NoteForm {
        NoteForm {
            title: title.into(),
            text: text.into(),
            slug: slug.into(),
        }
    }

    async fn create(service: &NoteService, user: &AuthUser, note: NoteForm) -> Note {
        match service.create(user, &note).await.unwrap() {
            FormOutcome::Saved(note) => note,
            FormOutcome::Invalid(errors) => panic!("note rejected: {:?}", errors),
        }
    }

    #[actix_web::test]
    async fn blank_slug_is_generated_from_the_title() {
        let notes = service();
        let note = create(&notes, &user("user1"), form("Note 1", "Note 1 Text", "")).await;
        assert_eq!(note.slug, "note-1");

        let long_title = "word ".repeat(19) + "tail";
        let note = create(&notes, &user("user1"), form(&long_title, "text", "")).await;
        assert!(note.slug.chars().count() <= SLUG_MAX_CHARS);
    }

    #[actix_web::test]
    async fn duplicate_slug_is_a_field_error() {
        let notes = service();
        create(&notes, &user("user1"), form("Note", "text", "shared")).await;

        let outcome = notes
            .create(&user("user2"), &form("Other", "text", "shared"))
            .await
            .unwrap();
        match outcome {
            FormOutcome::Invalid(errors) => {
                let value = serde_json::to_value(&errors).unwrap();
                assert_eq!(value["slug"][0], format!("shared{}", SLUG_TAKEN_WARNING));
            }
            FormOutcome::Saved(_) => panic!("duplicate slug accepted"),
        }
    }

    #[actix_web::test]
    async fn missing_fields_and_bad_slugs_are_reported() {
        let notes = service();
        let FormOutcome::Invalid(errors) = notes
            .create(&user("user1"), &form("", "", "not a slug!"))
            .await
            .unwrap()
        else {
            panic!("empty note accepted");
        };
        assert!(errors.has("title"));
        assert!(errors.has("text"));
        assert!(errors.has("slug"));
    }

    #[actix_web::test]
    async fn listing_only_shows_own_notes() {
        let notes = service();
        let alice = user("alice");
        let bob = user("bob");
        create(&notes, &alice, form("Note 1", "Note 1 Text", "")).await;
        create(&notes, &bob, form("Note 2", "Note 2 Text", "")).await;

        let titles: Vec<String> = notes
            .list_for(&alice)
            .await
            .unwrap()
            .into_iter()
            .map(|note| note.title)
            .collect();
        assert_eq!(titles, vec!["Note 1"]);
    }

    #[actix_web::test]
    async fn update_keeps_own_slug_and_guards_ownership() {
        let notes = service();
        let alice = user("alice");
        let bob = user("bob");
        let note = create(&notes, &alice, form("Title", "text", "my-note")).await;

        let err = notes
            .update("my-note", &bob, &form("Stolen", "text", "my-note"))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));

        let FormOutcome::Saved(updated) = notes
            .update("my-note", &alice, &form("New title", "new text", "my-note"))
            .await
            .unwrap()
        else {
            panic!("update rejected");
        };
        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, "New title");
        assert_eq!(notes.get_owned("my-note", &alice).await.unwrap().text, "new text");
    }

    #[actix_web::test]
    async fn delete_is_owner_only() {
        let notes = service();
        let alice = user("alice");
        create(&notes, &alice, form("Title", "text", "")).await;

        let err = notes.delete("title", &user("bob")).await.unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));

        notes.delete("title", &alice).await.unwrap();
        assert!(notes.list_for(&alice).await.unwrap().is_empty());
    }
}
