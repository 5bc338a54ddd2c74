//! Shared fixtures for the integration tests.

#![allow(dead_code)]

pub mod engine;

use safepred::{Bindable, Entity};
use serde::{Serialize, Serializer};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Entity)]
#[serde(rename_all = "camelCase")]
#[safepred(rename_all = "camelCase")]
pub struct Book {
    #[safepred(id)]
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(serialize_with = "as_seconds")]
    pub reading_time: Duration,
    pub state: BookState,
    pub genre: Genre,
    pub tags: Vec<String>,
    pub chapters: Vec<Chapter>,
    pub reviews: Vec<Review>,
    pub next_in_series: Option<Box<Book>>,
    #[serde(skip)]
    #[safepred(skip)]
    pub scratch: u32,
}

#[derive(Debug, Clone, Serialize, Entity)]
#[serde(rename_all = "camelCase")]
#[safepred(rename_all = "camelCase")]
pub struct Chapter {
    #[safepred(id)]
    pub id: u32,
    pub title: String,
    pub word_count: u32,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Serialize, Entity)]
pub struct Review {
    pub stars: u8,
    pub reviewer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Bindable)]
#[repr(i32)]
pub enum BookState {
    Draft = 0,
    Published = 1,
}

// Matches the integer binding of the repr.
impl Serialize for BookState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(*self as i32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Bindable)]
pub enum Genre {
    Adventure,
    Fantasy,
    #[serde(rename = "sci-fi")]
    #[safepred(rename = "sci-fi")]
    ScienceFiction,
}

fn as_seconds<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

pub fn hours(h: f64) -> Duration {
    Duration::from_secs_f64(h * 3600.0)
}

fn review(stars: u8, reviewer: &str) -> Review {
    Review {
        stars,
        reviewer: reviewer.to_owned(),
    }
}

fn chapter(id: u32, title: &str, word_count: u32, reviews: Vec<Review>) -> Chapter {
    Chapter {
        id,
        title: title.to_owned(),
        word_count,
        reviews,
    }
}

fn ratings(stars: &[u8]) -> Vec<Review> {
    stars.iter().map(|&s| review(s, "anonymous")).collect()
}

/// Four books with reading times of 3h, 3.5h, 4h and 20h.
pub fn library() -> Vec<Book> {
    let around = Book {
        id: 2,
        title: "Around the World".into(),
        author: "Jules Verne".into(),
        reading_time: hours(3.5),
        state: BookState::Published,
        genre: Genre::Adventure,
        tags: vec!["classic".into()],
        chapters: Vec::new(),
        reviews: ratings(&[2, 3]),
        next_in_series: None,
        scratch: 0,
    };

    let traveller = Book {
        id: 1,
        title: "The Naïve Traveller".into(),
        author: "Jules Verne".into(),
        reading_time: hours(3.0),
        state: BookState::Published,
        genre: Genre::Adventure,
        tags: vec!["classic".into(), "travel".into()],
        chapters: vec![
            chapter(11, "Departure", 3000, vec![review(5, "ada")]),
            chapter(12, "Naïve Beginnings", 2500, vec![review(4, "ada"), review(2, "bob")]),
        ],
        reviews: ratings(&[3, 4, 5, 4, 4, 5]),
        next_in_series: Some(Box::new(around.clone())),
        scratch: 7,
    };

    let wizard = Book {
        id: 3,
        title: "Harry Potter".into(),
        author: "J. K. Rowling".into(),
        reading_time: hours(4.0),
        state: BookState::Draft,
        genre: Genre::Fantasy,
        tags: Vec::new(),
        chapters: vec![
            chapter(31, "Hogwarts", 5000, vec![review(5, "cy")]),
            chapter(32, "Diagon Alley", 4000, Vec::new()),
        ],
        reviews: ratings(&[5, 5]),
        next_in_series: None,
        scratch: 0,
    };

    let dune = Book {
        id: 4,
        title: "Dune".into(),
        author: "Frank Herbert".into(),
        reading_time: hours(20.0),
        state: BookState::Published,
        genre: Genre::ScienceFiction,
        tags: vec!["sci-fi".into(), "epic".into()],
        chapters: vec![
            chapter(41, "Arrakis", 8000, vec![review(1, "dan"), review(2, "eve")]),
            chapter(42, "Desert", 9000, vec![review(3, "dan")]),
        ],
        reviews: ratings(&[4, 4, 3]),
        next_in_series: None,
        scratch: 0,
    };

    vec![traveller, around, wizard, dune]
}

/// Ids of the matched books, in fixture order.
pub fn ids(books: &[&Book]) -> Vec<i64> {
    books.iter().map(|b| b.id).collect()
}
