use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;

/// Usage token attached to every envelope the server returns.
pub const FUMS: &str = "<script>_BAPI.t('mock-fums');</script>";

#[derive(Clone, Debug, Serialize)]
pub struct Version {
    pub id: String,
    pub name: String,
    pub lang: String,
}

#[derive(Clone, Debug)]
pub struct Book {
    pub id: String,
    pub name: String,
    pub testament: String,
    pub version_id: String,
    pub chapters: Vec<Chapter>,
}

#[derive(Clone, Debug)]
pub struct Chapter {
    pub number: u32,
    pub verses: Vec<(u32, String)>,
    pub footnotes: Vec<String>,
}

/// The fixture the server answers from. Read-only once built.
#[derive(Clone, Debug)]
pub struct Library {
    pub versions: Vec<Version>,
    pub books: Vec<Book>,
}

pub type Db = Arc<Library>;

impl Library {
    pub fn sample() -> Self {
        let second_timothy_1 = Chapter {
            number: 1,
            verses: vec![
                (1, "From Paul, an apostle of Christ Jesus by God's will.".to_string()),
                (2, "To Timothy, my dear son.".to_string()),
                (3, "I give thanks to God, whom I serve with a clear conscience.".to_string()),
                (
                    15,
                    "You know that everyone in the province of Asia deserted me, \
                     including Phygelus and Hermogenes."
                        .to_string(),
                ),
            ],
            footnotes: vec!["1.15: Asia: a Roman province.".to_string()],
        };
        let mut chapters = vec![second_timothy_1];
        chapters.extend((2..=4).map(|number| Chapter {
            number,
            verses: vec![(1, format!("Chapter {number}, verse 1."))],
            footnotes: Vec::new(),
        }));

        Self {
            versions: vec![
                Version {
                    id: "eng-GNTD".to_string(),
                    name: "Good News Translation".to_string(),
                    lang: "eng".to_string(),
                },
                Version {
                    id: "spa-RVR60".to_string(),
                    name: "Reina-Valera 1960".to_string(),
                    lang: "spa".to_string(),
                },
            ],
            books: vec![
                Book {
                    id: "eng-GNTD:2Tim".to_string(),
                    name: "2 Timothy".to_string(),
                    testament: "NT".to_string(),
                    version_id: "eng-GNTD".to_string(),
                    chapters,
                },
                Book {
                    id: "eng-GNTD:Ruth".to_string(),
                    name: "Ruth".to_string(),
                    testament: "OT".to_string(),
                    version_id: "eng-GNTD".to_string(),
                    chapters: vec![Chapter {
                        number: 1,
                        verses: vec![(1, "Long ago, in the days before Israel had a king.".to_string())],
                        footnotes: Vec::new(),
                    }],
                },
            ],
        }
    }

    fn book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Look up `VERSION:BOOK.CHAPTER`.
    fn chapter(&self, id: &str) -> Option<(&Book, &Chapter)> {
        let (book_id, number) = id.rsplit_once('.')?;
        let number: u32 = number.parse().ok()?;
        let book = self.book(book_id)?;
        book.chapters
            .iter()
            .find(|c| c.number == number)
            .map(|c| (book, c))
    }
}

pub fn app() -> Router {
    app_with(Library::sample())
}

pub fn app_with(library: Library) -> Router {
    let db: Db = Arc::new(library);
    Router::new()
        .route("/versions.js", get(list_versions))
        .route("/versions/{id}", get(get_version))
        .route("/versions/{id}/books.js", get(list_books))
        .route("/books/{id}", get(get_book))
        .route("/books/{id}/chapters.js", get(list_chapters))
        .route("/chapters/{id}", get(get_chapter))
        .route("/chapters/{id}/verses.js", get(list_verses))
        .route("/verses/{id}", get(get_verse))
        .route("/passages.js", get(get_passages))
        .route("/search.js", get(search))
        .layer(middleware::from_fn(require_basic_auth))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// The real service answers unauthenticated calls with an HTML page, not JSON.
async fn require_basic_auth(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if !authorized {
        debug!(uri = %request.uri(), "rejecting unauthenticated request");
        return (
            StatusCode::UNAUTHORIZED,
            [(header::CONTENT_TYPE, "text/html")],
            "<html><body><h1>401 Unauthorized</h1></body></html>",
        )
            .into_response();
    }
    next.run(request).await
}

fn envelope(status: StatusCode, mut body: Value) -> (StatusCode, Json<Value>) {
    if let Some(section) = body.as_object_mut() {
        section.insert("meta".to_string(), json!({"fums": FUMS, "fums_tid": "mock"}));
    }
    (status, Json(json!({ "response": body })))
}

fn found(body: Value) -> (StatusCode, Json<Value>) {
    envelope(StatusCode::OK, body)
}

fn not_found() -> (StatusCode, Json<Value>) {
    envelope(StatusCode::NOT_FOUND, json!({}))
}

/// Resource ids arrive as `ID.js`.
fn strip_js(file: &str) -> Option<&str> {
    file.strip_suffix(".js")
}

fn marginalia(params: &HashMap<String, String>) -> bool {
    params.get("include_marginalia").is_some_and(|v| v == "true")
}

fn chapter_json(book: &Book, chapter: &Chapter, with_text: bool, with_marginalia: bool) -> Value {
    let id = format!("{}.{}", book.id, chapter.number);
    let mut value = json!({
        "auditid": "0",
        "label": "",
        "chapter": chapter.number.to_string(),
        "id": id,
        "osis_end": format!("{}.{}.{}", book.version_id, book.name, chapter.number),
        "parent": {"book": {"id": book.id, "name": book.name}},
        "next": {"chapter": {"id": format!("{}.{}", book.id, chapter.number + 1)}},
        "previous": {"chapter": {"id": format!("{}.{}", book.id, chapter.number.saturating_sub(1))}},
        "copyright": "Good News Translation (mock)",
    });
    if with_text {
        let text: Vec<String> = chapter
            .verses
            .iter()
            .map(|(n, t)| format!("<sup>{n}</sup>{t}"))
            .collect();
        value["text"] = Value::String(text.join(" "));
    }
    if with_marginalia {
        value["footnotes"] = json!(chapter.footnotes);
    }
    value
}

fn verse_json(book: &Book, chapter: &Chapter, verse: &(u32, String), with_marginalia: bool) -> Value {
    let mut value = json!({
        "id": format!("{}.{}.{}", book.id, chapter.number, verse.0),
        "verse": verse.0.to_string(),
        "reference": format!("{} {}:{}", book.name, chapter.number, verse.0),
        "text": verse.1,
    });
    if with_marginalia {
        value["footnotes"] = json!(chapter.footnotes);
    }
    value
}

async fn list_versions(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let versions: Vec<&Version> = db
        .versions
        .iter()
        .filter(|v| params.get("language").map_or(true, |lang| &v.lang == lang))
        .collect();
    found(json!({ "versions": versions }))
}

async fn get_version(State(db): State<Db>, Path(file): Path<String>) -> (StatusCode, Json<Value>) {
    let Some(id) = strip_js(&file) else {
        return not_found();
    };
    match db.versions.iter().find(|v| v.id == id) {
        Some(version) => found(json!({ "versions": [version] })),
        None => not_found(),
    }
}

async fn list_books(
    State(db): State<Db>,
    Path(version_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let books: Vec<Value> = db
        .books
        .iter()
        .filter(|b| b.version_id == version_id)
        .filter(|b| params.get("testament").map_or(true, |t| &b.testament == t))
        .map(|b| json!({"id": b.id, "name": b.name, "testament": b.testament}))
        .collect();
    if books.is_empty() {
        return not_found();
    }
    found(json!({ "books": books }))
}

async fn get_book(State(db): State<Db>, Path(file): Path<String>) -> (StatusCode, Json<Value>) {
    match strip_js(&file).and_then(|id| db.book(id)) {
        Some(b) => found(json!({"books": [{"id": b.id, "name": b.name, "testament": b.testament}]})),
        None => not_found(),
    }
}

async fn list_chapters(State(db): State<Db>, Path(book_id): Path<String>) -> (StatusCode, Json<Value>) {
    let Some(book) = db.book(&book_id) else {
        return not_found();
    };
    let chapters: Vec<Value> = book
        .chapters
        .iter()
        .map(|c| chapter_json(book, c, false, false))
        .collect();
    found(json!({ "chapters": chapters }))
}

async fn get_chapter(
    State(db): State<Db>,
    Path(file): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    match strip_js(&file).and_then(|id| db.chapter(id)) {
        Some((book, chapter)) => {
            found(json!({ "chapters": [chapter_json(book, chapter, true, marginalia(&params))] }))
        }
        None => not_found(),
    }
}

async fn list_verses(
    State(db): State<Db>,
    Path(chapter_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let Some((book, chapter)) = db.chapter(&chapter_id) else {
        return not_found();
    };
    let start: u32 = params.get("start").and_then(|s| s.parse().ok()).unwrap_or(0);
    let end: u32 = params.get("end").and_then(|s| s.parse().ok()).unwrap_or(u32::MAX);
    let verses: Vec<Value> = chapter
        .verses
        .iter()
        .filter(|(n, _)| (start..=end).contains(n))
        .map(|v| verse_json(book, chapter, v, marginalia(&params)))
        .collect();
    found(json!({ "verses": verses }))
}

async fn get_verse(
    State(db): State<Db>,
    Path(file): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let found_verse = strip_js(&file)
        .and_then(|id| id.rsplit_once('.'))
        .and_then(|(chapter_id, number)| {
            let number: u32 = number.parse().ok()?;
            let (book, chapter) = db.chapter(chapter_id)?;
            let verse = chapter.verses.iter().find(|(n, _)| *n == number)?;
            Some(verse_json(book, chapter, verse, marginalia(&params)))
        });
    match found_verse {
        Some(verse) => found(json!({ "verses": [verse] })),
        None => not_found(),
    }
}

/// Parse `BOOK C1:V1-C2:V2`.
fn parse_range(q: &str) -> Option<(&str, (u32, u32), (u32, u32))> {
    let (book, range) = q.split_once(' ')?;
    let (start, end) = range.split_once('-')?;
    let point = |s: &str| -> Option<(u32, u32)> {
        let (c, v) = s.split_once(':')?;
        Some((c.parse().ok()?, v.parse().ok()?))
    };
    Some((book, point(start)?, point(end)?))
}

async fn get_passages(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let (Some(q), Some(version)) = (params.get("q[]"), params.get("version")) else {
        return found(json!({ "passages": [] }));
    };
    let Some((book_id, start, end)) = parse_range(q) else {
        return found(json!({ "passages": [] }));
    };
    let Some(book) = db.book(&format!("{version}:{book_id}")) else {
        return found(json!({ "passages": [] }));
    };
    let text: Vec<String> = book
        .chapters
        .iter()
        .flat_map(|c| c.verses.iter().map(move |(n, t)| ((c.number, *n), t)))
        .filter(|(at, _)| (start..=end).contains(at))
        .map(|(_, t)| t.clone())
        .collect();
    let mut passage = json!({
        "display": format!("{} {}", book.name, &q[book_id.len() + 1..]),
        "version": version,
        "text": text.join(" "),
    });
    if marginalia(&params) {
        passage["footnotes"] = json!([]);
    }
    found(json!({ "passages": [passage] }))
}

async fn search(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let query = params.get("query").cloned().unwrap_or_default();
    let scope: Vec<&str> = params
        .get("version")
        .map(|v| v.split(',').collect())
        .unwrap_or_default();

    if parse_range(&query).is_some() {
        return found(json!({"search": {"result": {
            "type": "passages",
            "passages": [{"display": query}],
        }}}));
    }

    let needle = query.to_lowercase();
    let verses: Vec<Value> = db
        .books
        .iter()
        .filter(|b| scope.is_empty() || scope.contains(&b.version_id.as_str()))
        .flat_map(|b| {
            b.chapters
                .iter()
                .flat_map(move |c| c.verses.iter().map(move |v| (b, c, v)))
        })
        .filter(|(_, _, (_, text))| text.to_lowercase().contains(&needle))
        .map(|(b, c, v)| verse_json(b, c, v, false))
        .collect();
    found(json!({"search": {"result": {"type": "verses", "verses": verses}}}))
}
