use std::path::PathBuf;

/// ストアファイルのパスを指定する環境変数
pub const STORE_PATH_ENV: &str = "BOOKSHELF_STORE_PATH";

/// 引数・環境変数とも無い場合のストアファイル
pub const DEFAULT_STORE_FILE: &str = "bookshelf.json";

/// `RUST_LOG` 未設定時のログフィルタ
pub const DEFAULT_LOG_FILTER: &str = "bookshelf_mcp=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl StoreConfig {
    /// 第1引数 → `BOOKSHELF_STORE_PATH` → `bookshelf.json` の順で決める。
    pub fn from_env() -> Self {
        Self::resolve(std::env::args().nth(1), std::env::var(STORE_PATH_ENV).ok())
    }

    pub fn resolve(arg: Option<String>, env: Option<String>) -> Self {
        let path = arg
            .or(env)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE));
        Self { path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_wins_over_env() {
        let cfg = StoreConfig::resolve(Some("a.json".into()), Some("b.json".into()));
        assert_eq!(cfg.path, PathBuf::from("a.json"));
    }

    #[test]
    fn env_used_without_argument() {
        let cfg = StoreConfig::resolve(None, Some("b.json".into()));
        assert_eq!(cfg.path, PathBuf::from("b.json"));
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(
            StoreConfig::resolve(None, None).path,
            PathBuf::from(DEFAULT_STORE_FILE)
        );
        assert_eq!(
            StoreConfig::resolve(None, Some("  ".into())).path,
            PathBuf::from(DEFAULT_STORE_FILE)
        );
    }
}
