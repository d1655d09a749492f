//! Sample blog model.

use chrono::{DateTime, TimeZone, Utc};
use jsonapi_domain::{Describable, DescriptorBuilder, Links};

#[derive(Debug, Default)]
pub struct Blog {
    pub id: u64,
    pub links: Links,
    pub title: String,
    pub posts: Vec<Post>,
    pub current_post: Option<Box<Post>>,
    pub created_at: DateTime<Utc>,
    pub view_count: u64,
}

impl Describable for Blog {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields
            .primary("id", "primary,blogs", |b| b.id)
            .links("links", "links,top", |b| Some(&b.links))
            .attribute("title", "attr,title", |b| b.title.clone())
            .to_many("posts", "relation,posts", |b| b.posts.as_slice())
            .to_one("current_post", "relation,current_post", |b| b.current_post.as_deref())
            .attribute("created_at", "attr,created_at", |b| b.created_at)
            .attribute("view_count", "attr,view_count", |b| b.view_count);
    }
}

#[derive(Debug, Default)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub comments: Vec<Comment>,
}

impl Describable for Post {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields
            .primary("id", "primary,posts", |p| p.id)
            .attribute("title", "attr,title", |p| p.title.clone())
            .attribute("body", "attr,body", |p| p.body.clone())
            .to_many("comments", "relation,comments", |p| p.comments.as_slice());
    }
}

#[derive(Debug, Default, Clone)]
pub struct Comment {
    pub id: u64,
    pub body: String,
}

impl Describable for Comment {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields
            .primary("id", "primary,comments", |c| c.id)
            .attribute("body", "attr,body", |c| c.body.clone());
    }
}

fn comment(id: u64, body: &str) -> Comment {
    Comment {
        id,
        body: body.to_string(),
    }
}

fn post(id: u64, title: &str, comments: Vec<Comment>) -> Post {
    Post {
        id,
        title: title.to_string(),
        body: format!("Body of {title}"),
        comments,
    }
}

/// Builds a blog whose two posts share a comment.
pub fn sample_blog(id: u64) -> Blog {
    let shared = comment(1, "First!");
    Blog {
        id,
        links: Links::from([(
            "self".to_string(),
            format!("https://localhost:8080/api/v1/blogs/{id}"),
        )]),
        title: format!("Blog {id}"),
        posts: vec![
            post(id * 10 + 1, "Hello", vec![shared.clone(), comment(2, "Nice")]),
            post(id * 10 + 2, "Again", vec![shared, comment(3, "Meh")]),
        ],
        current_post: Some(Box::new(post(id * 10 + 2, "Again", Vec::new()))),
        created_at: Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .unwrap_or_default(),
        view_count: 42,
    }
}
