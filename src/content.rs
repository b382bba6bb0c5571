mod comment;
mod ident;
mod post;
mod subscriber;
pub mod validate;

pub use self::{
    comment::{Authored, Comment, CommentForm, Reply, is_duplicate, normalize},
    ident::new_id,
    post::{ImageUpload, Post, PostForm, read_time, split_bullet_points},
    subscriber::Subscriber,
};
