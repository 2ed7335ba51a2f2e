//! File Session Repository Implementation
//!
//! SessionRepositoryのファイル実装（キーごとに1つのJSONファイル）

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::entities::session::{Session, SessionKey};
use crate::domain::repositories::session_repository::SessionRepository;

/// ファイルベースのセッションリポジトリ
///
/// 同じキーへの同時書き込みはロックしない（後勝ち）
pub struct FileSessionRepository {
    dir: PathBuf,
}

/// セッション（JSON永続化用の内部表現）
#[derive(Debug, Deserialize, Serialize)]
struct SessionJson {
    payload: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl FileSessionRepository {
    /// 新しいリポジトリを作成
    ///
    /// # Arguments
    ///
    /// * `dir` - セッションファイルを置くディレクトリ
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// キーに対応するファイルパス
    pub fn session_path(&self, key: &SessionKey) -> PathBuf {
        self.dir
            .join(format!("garmin_session_{}.json", key.as_str()))
    }

    /// ファイルからセッションを読み込む（同期処理）
    fn load_sync(path: &Path) -> Result<Option<SessionJson>> {
        if !path.exists() {
            info!("No stored session at {}", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(path).context("Failed to read session file")?;

        let session: SessionJson =
            serde_json::from_str(&content).context("Failed to parse session JSON")?;

        Ok(Some(session))
    }

    /// ファイルにセッションを保存する（同期処理）
    fn save_sync(path: &Path, session: &SessionJson) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create session directory")?;
        }

        let json = serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        // セッションは資格情報と同等なので所有者のみ読み書き可能にする
        // 権限は書き込む前に確定させる（既存ファイルも含む）
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path).context("Failed to open session file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .context("Failed to restrict session file permissions")?;
        }

        file.write_all(json.as_bytes())
            .context("Failed to write session file")?;

        info!("Saved session to {}", path.display());

        Ok(())
    }

    /// JSON形式からDomain形式に変換
    fn to_domain_session(json_session: SessionJson) -> Session {
        Session {
            payload: json_session.payload,
            created_at: json_session.created_at,
        }
    }

    /// Domain形式からJSON形式に変換
    fn from_domain_session(session: &Session) -> SessionJson {
        SessionJson {
            payload: session.payload.clone(),
            created_at: session.created_at,
        }
    }
}

#[async_trait]
impl SessionRepository for FileSessionRepository {
    async fn load(&self, key: &SessionKey) -> Result<Option<Session>> {
        let path = self.session_path(key);
        let json_session = tokio::task::spawn_blocking(move || Self::load_sync(&path))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??;

        Ok(json_session.map(Self::to_domain_session))
    }

    async fn save(&self, key: &SessionKey, session: &Session) -> Result<()> {
        let path = self.session_path(key);
        let json_session = Self::from_domain_session(session);
        tokio::task::spawn_blocking(move || Self::save_sync(&path, &json_session))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??;

        Ok(())
    }
}
