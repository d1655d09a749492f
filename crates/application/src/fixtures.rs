//! Test models shared by the engine's unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, OnceLock, Weak};

use chrono::{DateTime, TimeZone, Utc};
use jsonapi_domain::{Describable, DescriptorBuilder, Links};

#[derive(Debug, Default)]
pub struct Blog {
    pub id: i64,
    pub links: Links,
    pub title: String,
    pub posts: Vec<Post>,
    pub posts_links: Links,
    pub current_post: Option<Box<Post>>,
    pub current_post_links: Links,
    pub current_post_id: i64,
    pub created_at: DateTime<Utc>,
    pub view_count: i64,
}

impl Describable for Blog {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields
            .primary("id", "primary,blogs", |b| b.id)
            .links("links", "links,top", |b| Some(&b.links))
            .attribute("title", "attr,title", |b| b.title.clone())
            .to_many("posts", "relation,posts", |b| b.posts.as_slice())
            .links("posts_links", "links,posts", |b| Some(&b.posts_links))
            .to_one("current_post", "relation,current_post", |b| b.current_post.as_deref())
            .links("current_post_links", "links,current_post", |b| {
                Some(&b.current_post_links)
            })
            .attribute("current_post_id", "attr,current_post_id", |b| b.current_post_id)
            .attribute("created_at", "attr,created_at", |b| b.created_at)
            .attribute("view_count", "attr,view_count", |b| b.view_count);
    }
}

#[derive(Debug, Default)]
pub struct Post {
    pub blog: Blog,
    pub id: i64,
    pub links: Links,
    pub blog_id: i64,
    pub title: String,
    pub body: String,
    pub comments: Vec<Comment>,
    pub comments_links: Links,
    pub latest_comment: Option<Comment>,
    pub latest_comment_links: Links,
}

impl Describable for Post {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields
            .embed("blog", |p| &p.blog)
            .primary("id", "primary,posts", |p| p.id)
            .links("links", "links,top", |p| Some(&p.links))
            .attribute("blog_id", "attr,blog_id", |p| p.blog_id)
            .attribute("title", "attr,title", |p| p.title.clone())
            .attribute("body", "attr,body", |p| p.body.clone())
            .to_many("comments", "relation,comments", |p| p.comments.as_slice())
            .links("comments_links", "links,comments", |p| Some(&p.comments_links))
            .to_one("latest_comment", "relation,latest_comment", |p| p.latest_comment.as_ref())
            .links("latest_comment_links", "links,latest_comment", |p| {
                Some(&p.latest_comment_links)
            });
    }
}

#[derive(Debug, Default, Clone)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub body: String,
}

impl Describable for Comment {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields
            .primary("id", "primary,comments", |c| c.id)
            .attribute("post_id", "attr,post_id", |c| c.post_id)
            .attribute("body", "attr,body", |c| c.body.clone());
    }
}

/// Records linked in a cycle through weak back-references.
#[derive(Debug)]
pub struct Ring {
    pub id: u32,
    pub next: OnceLock<Weak<Ring>>,
}

impl Ring {
    /// Builds `len` rings, each pointing at the next and the last at the first.
    pub fn of(len: u32) -> Vec<Arc<Self>> {
        let ring: Vec<Arc<Self>> = (1..=len)
            .map(|id| {
                Arc::new(Self {
                    id,
                    next: OnceLock::new(),
                })
            })
            .collect();
        for (index, node) in ring.iter().enumerate() {
            let next = &ring[(index + 1) % ring.len()];
            node.next.set(Arc::downgrade(next)).unwrap();
        }
        ring
    }
}

impl Describable for Ring {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields
            .primary("id", "primary,rings", |r| r.id)
            .to_one_shared("next", "relation,next", |r| r.next.get().and_then(Weak::upgrade));
    }
}

/// Primary annotation without its resource type.
#[derive(Debug, Default)]
pub struct BadModel {
    pub id: i64,
}

impl Describable for BadModel {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields.primary("id", "primary", |m| m.id);
    }
}

/// Declares attributes but no primary field.
#[derive(Debug, Default)]
pub struct Orphaned {
    pub name: String,
}

impl Describable for Orphaned {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields.attribute("name", "attr,name", |o| o.name.clone());
    }
}

/// Relates to records that declare no primary field.
#[derive(Debug, Default)]
pub struct Holder {
    pub id: i64,
    pub owner: Option<Orphaned>,
    pub members: Vec<Orphaned>,
}

impl Describable for Holder {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields
            .primary("id", "primary,holders", |h| h.id)
            .to_one("owner", "relation,owner", |h| h.owner.as_ref())
            .to_many("members", "relation,members", |h| h.members.as_slice());
    }
}

fn comment(id: i64, body: &str) -> Comment {
    Comment {
        id,
        body: body.to_string(),
        ..Default::default()
    }
}

fn post(id: i64, title: &str, body: &str, comments: Vec<Comment>) -> Post {
    Post {
        id,
        title: title.to_string(),
        body: body.to_string(),
        comments,
        latest_comment: Some(comment(1, "foo")),
        ..Default::default()
    }
}

/// Blog 5 with two posts sharing comment 1, and post 1 as current post.
pub fn test_blog() -> Blog {
    Blog {
        id: 5,
        title: "Title 1".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        posts: vec![
            post(1, "Foo", "Bar", vec![comment(1, "foo"), comment(2, "bar")]),
            post(2, "Fuubar", "Bas", vec![comment(1, "foo"), comment(3, "bas")]),
        ],
        current_post: Some(Box::new(post(
            1,
            "Foo",
            "Bar",
            vec![comment(1, "foo"), comment(2, "bar")],
        ))),
        ..Default::default()
    }
}
