// Demo fixtures for an empty database (`--seed`)
use crate::db::models::Role;
use crate::db::users::NewUser;
use crate::db::{PostStore, StoreError, UserStore};

/// Returns `false` without touching anything if users already exist.
pub fn seed(users: &UserStore, posts: &PostStore) -> Result<bool, StoreError> {
    if users.count()? > 0 {
        tracing::info!("Database already has users; skipping seed data");
        return Ok(false);
    }

    let john = users.create_user(NewUser {
        username: Some("John"),
        email: "John@mail.com",
        password: "J123",
        role: Role::User,
    })?;
    let benoit = users.create_user(NewUser {
        username: Some("Benoit"),
        email: "BB@mail.com",
        password: "BB12",
        role: Role::User,
    })?;
    let admin = users.create_user(NewUser {
        username: Some("admin"),
        email: "admin@mail.com",
        password: "admin",
        role: Role::Admin,
    })?;

    let eggs = posts.create_post(&john.id, "How do you fry an egg?", "Wow, way too easy")?;
    let japanese = posts.create_post(
        &john.id,
        "Learning Japanese by cooking",
        "Share your recipes and they will be translated",
    )?;
    posts.create_post(&john.id, "How do I build a website?", "You can use JS")?;
    let auction = posts.create_post(
        &benoit.id,
        "Auctioning off my slippers",
        "Post your offers",
    )?;
    let dune = posts.create_post(
        &benoit.id,
        "Denis Villeneuve's Dune",
        "Loved it, can't wait for the third one",
    )?;

    posts.create_comment(&eggs.id, &admin.id, "Tried it, works great")?;
    posts.create_comment(&japanese.id, &admin.id, "I love sushi!")?;
    posts.create_comment(&auction.id, &benoit.id, "I offer 50 cents")?;
    posts.create_comment(&dune.id, &john.id, "Saw the first one and didn't like it")?;

    tracing::info!("Seeded 3 users, 5 posts and 4 comments");
    Ok(true)
}
