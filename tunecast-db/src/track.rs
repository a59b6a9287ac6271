use serde::{Deserialize, Serialize};
use turso::{Connection, Row, Value};

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct Track {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub duration_sec: Option<f64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackCreate {
    pub name: String,
    pub path: String,
    pub duration_sec: Option<f64>,
}

const COLUMNS: &str = "id, name, path, duration_sec, created_at, updated_at";

pub async fn query_all(conn: &Connection) -> anyhow::Result<Vec<Track>> {
    let mut rows = conn
        .query(
            &format!("SELECT {} FROM tracks ORDER BY id DESC", COLUMNS),
            (),
        )
        .await?;
    let mut tracks = Vec::new();
    while let Some(row) = rows.next().await? {
        if let Some(track) = row_to_track(Some(row))? {
            tracks.push(track);
        }
    }
    Ok(tracks)
}

pub async fn by_id(id: i64, conn: &Connection) -> anyhow::Result<Option<Track>> {
    let mut rows = conn
        .query(
            &format!("SELECT {} FROM tracks WHERE id = ?1 LIMIT 1", COLUMNS),
            (id,),
        )
        .await?;
    row_to_track(rows.next().await?)
}

pub async fn by_name(name: &str, conn: &Connection) -> anyhow::Result<Option<Track>> {
    let mut rows = conn
        .query(
            &format!("SELECT {} FROM tracks WHERE name = ?1 LIMIT 1", COLUMNS),
            (name,),
        )
        .await?;
    row_to_track(rows.next().await?)
}

pub async fn insert(create: &TrackCreate, conn: &Connection) -> anyhow::Result<Track> {
    // Names double as stable client-facing labels; keep them unique
    if by_name(&create.name, conn).await?.is_some() {
        return Err(anyhow::anyhow!(
            "Track with name '{}' already exists",
            create.name
        ));
    }

    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let duration = match create.duration_sec {
        Some(d) => Value::Real(d),
        None => Value::Null,
    };

    conn.execute(
        "INSERT INTO tracks (name, path, duration_sec, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
        (
            create.name.as_str(),
            create.path.as_str(),
            duration,
            now.as_str(),
        ),
    )
    .await?;

    let last_id = conn.last_insert_rowid();
    by_id(last_id, conn)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Insert failed, track not found"))
}

pub async fn delete(id: i64, conn: &Connection) -> anyhow::Result<bool> {
    let affected = conn
        .execute("DELETE FROM tracks WHERE id = ?1", (id,))
        .await?;
    Ok(affected > 0)
}

fn row_to_track(row: Option<Row>) -> anyhow::Result<Option<Track>> {
    if let Some(row) = row {
        let id = row
            .get_value(0)
            .map_err(anyhow::Error::from)?
            .as_integer()
            .ok_or_else(|| anyhow::anyhow!("id is null"))?
            .to_owned();
        let name = row
            .get_value(1)?
            .as_text()
            .ok_or_else(|| anyhow::anyhow!("name is null"))?
            .to_owned();
        let path = row
            .get_value(2)?
            .as_text()
            .ok_or_else(|| anyhow::anyhow!("path is null"))?
            .to_owned();
        let duration_sec = row.get_value(3)?.as_real().copied();
        let created_at = row.get_value(4)?.as_text().map(|s| s.to_owned());
        let updated_at = row.get_value(5)?.as_text().map(|s| s.to_owned());
        return Ok(Some(Track {
            id,
            name,
            path,
            duration_sec,
            created_at,
            updated_at,
        }));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CatalogDatabase, DatabaseConfig};

    async fn test_conn() -> Connection {
        let config = DatabaseConfig::new(":memory:");
        let db = CatalogDatabase::new(&config).await.unwrap();
        let mut conn = db.connect().unwrap();
        crate::migrations::run(&mut conn).await.unwrap();
        conn
    }

    fn sample(name: &str) -> TrackCreate {
        TrackCreate {
            name: name.to_string(),
            path: format!("/music/{}.flac", name),
            duration_sec: Some(241.5),
        }
    }

    #[tokio::test]
    async fn test_insert_and_by_id() {
        let conn = test_conn().await;
        let track = insert(&sample("one"), &conn).await.unwrap();
        assert!(track.id > 0);

        let found = by_id(track.id, &conn).await.unwrap().unwrap();
        assert_eq!(found.name, "one");
        assert_eq!(found.path, "/music/one.flac");
        assert_eq!(found.duration_sec, Some(241.5));
        assert!(found.created_at.is_some());
    }

    #[tokio::test]
    async fn test_by_id_missing() {
        let conn = test_conn().await;
        let found = by_id(42, &conn).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let conn = test_conn().await;
        insert(&sample("one"), &conn).await.unwrap();
        let dup = insert(&sample("one"), &conn).await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn test_query_all_newest_first() {
        let conn = test_conn().await;
        let a = insert(&sample("a"), &conn).await.unwrap();
        let b = insert(&sample("b"), &conn).await.unwrap();

        let all = query_all(&conn).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, b.id);
        assert_eq!(all[1].id, a.id);
    }

    #[tokio::test]
    async fn test_delete() {
        let conn = test_conn().await;
        let track = insert(&sample("one"), &conn).await.unwrap();

        assert!(delete(track.id, &conn).await.unwrap());
        assert!(!delete(track.id, &conn).await.unwrap());
        assert!(by_id(track.id, &conn).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_without_duration() {
        let conn = test_conn().await;
        let create = TrackCreate {
            name: "nodur".to_string(),
            path: "/music/nodur.wav".to_string(),
            duration_sec: None,
        };
        let track = insert(&create, &conn).await.unwrap();
        assert!(track.duration_sec.is_none());
    }
}
