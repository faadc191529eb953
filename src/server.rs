//! Static file server for the web build
//!
//! Serves the web root (HTML shell, wasm bundle, any assets) over HTTP.
//! `/` maps to `index.html`; there are no dynamic endpoints.

use std::io;
use std::path::{Component, Path, PathBuf};

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, middleware, web};

/// Default port, overridden by `PORT`
pub const DEFAULT_PORT: u16 = 3000;
/// Default bind host, overridden by `DUCK_HUNT_HOST`
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default web root, overridden by `DUCK_HUNT_ROOT`
pub const DEFAULT_ROOT: &str = "web";
/// File served for `/` and for directory requests
pub const INDEX_FILE: &str = "index.html";

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid PORT value {0:?}")]
    InvalidPort(String),
    #[error("web root {} is not a directory", .0.display())]
    MissingRoot(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory the game is served from
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            root: PathBuf::from(DEFAULT_ROOT),
        }
    }
}

impl ServerConfig {
    /// Read `PORT`, `DUCK_HUNT_HOST` and `DUCK_HUNT_ROOT` from the environment
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ServerError::InvalidPort(port.clone()))?;
        }
        if let Some(host) = lookup("DUCK_HUNT_HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(root) = lookup("DUCK_HUNT_ROOT").filter(|r| !r.trim().is_empty()) {
            config.root = PathBuf::from(root.trim());
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// Map a request path onto a file under `root`.
///
/// Returns `None` for any path that would leave the root.
pub fn resolve_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    if relative.is_empty() {
        return Some(root.join(INDEX_FILE));
    }
    // Backslashes are separators on Windows
    if relative.contains('\\') {
        return None;
    }

    let mut resolved = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

/// Content type by file extension
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Read a file, serving the index for directories
fn read_asset(path: &Path) -> io::Result<(PathBuf, Vec<u8>)> {
    let path = if path.is_dir() {
        path.join(INDEX_FILE)
    } else {
        path.to_path_buf()
    };
    let bytes = std::fs::read(&path)?;
    Ok((path, bytes))
}

/// GET /{path}
async fn serve_file(req: HttpRequest, config: web::Data<ServerConfig>) -> HttpResponse {
    let request_path = req.match_info().query("tail").to_string();

    let Some(path) = resolve_path(&config.root, &request_path) else {
        log::warn!("Rejected path outside web root: {:?}", request_path);
        return HttpResponse::NotFound().finish();
    };

    match web::block(move || read_asset(&path)).await {
        Ok(Ok((path, bytes))) => HttpResponse::Ok()
            .content_type(content_type_for(&path))
            .body(bytes),
        Ok(Err(e)) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            log::debug!("Not found: /{}", request_path);
            HttpResponse::NotFound().finish()
        }
        Ok(Err(e)) => {
            log::error!("Failed to read /{}: {}", request_path, e);
            HttpResponse::InternalServerError().finish()
        }
        Err(e) => {
            log::error!("Blocking read for /{} failed: {}", request_path, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Register the static routes
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_file))
        .route("/{tail:.*}", web::head().to(serve_file));
}

/// Run the server until shutdown
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    if !config.root.is_dir() {
        return Err(ServerError::MissingRoot(config.root.clone()));
    }

    let (host, port) = config.bind_address();
    log::info!("Serving {} on http://{}:{}", config.root.display(), host, port);

    let data = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header};
    use actix_web::test::{TestRequest, call_service, init_service, read_body};
    use std::collections::HashMap;

    fn web_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let web = dir.path().join("web");
        std::fs::create_dir_all(web.join("pkg")).unwrap();
        std::fs::write(web.join("index.html"), "<html>duck</html>").unwrap();
        std::fs::write(web.join("pkg").join("duck_hunt.js"), "export default 1;").unwrap();
        std::fs::write(web.join("pkg").join("duck_hunt_bg.wasm"), [0u8, 97, 115, 109]).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "nope").unwrap();
        dir
    }

    fn config_for(dir: &tempfile::TempDir) -> ServerConfig {
        ServerConfig {
            root: dir.path().join("web"),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_root_is_index() {
        let root = Path::new("/srv/web");
        assert_eq!(resolve_path(root, "/"), Some(root.join("index.html")));
        assert_eq!(resolve_path(root, ""), Some(root.join("index.html")));
    }

    #[test]
    fn test_resolve_nested_paths() {
        let root = Path::new("/srv/web");
        assert_eq!(
            resolve_path(root, "/pkg/duck_hunt.js"),
            Some(root.join("pkg").join("duck_hunt.js"))
        );
        assert_eq!(
            resolve_path(root, "./pkg/./a.wasm"),
            Some(root.join("pkg").join("a.wasm"))
        );
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let root = Path::new("/srv/web");
        assert_eq!(resolve_path(root, "/../secret.txt"), None);
        assert_eq!(resolve_path(root, "pkg/../../secret.txt"), None);
        assert_eq!(resolve_path(root, "pkg\\..\\secret.txt"), None);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for(Path::new("a.wasm")), "application/wasm");
        assert_eq!(content_type_for(Path::new("INDEX.HTML")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Path::new("duck.png")), "image/png");
        assert_eq!(content_type_for(Path::new("shot.wav")), "audio/wav");
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn test_config_defaults_and_overrides() {
        let empty: HashMap<&str, &str> = HashMap::new();
        let config = ServerConfig::from_lookup(|k| empty.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 3000);

        let vars: HashMap<&str, &str> = [
            ("PORT", "8081"),
            ("DUCK_HUNT_HOST", "0.0.0.0"),
            ("DUCK_HUNT_ROOT", "dist"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.root, PathBuf::from("dist"));
    }

    #[test]
    fn test_config_rejects_bad_port() {
        let result = ServerConfig::from_lookup(|k| (k == "PORT").then(|| "duck".to_string()));
        assert!(matches!(result, Err(ServerError::InvalidPort(ref p)) if p == "duck"));
    }

    #[actix_web::test]
    async fn test_serves_index_at_root() {
        let dir = web_root();
        let app = init_service(
            App::new()
                .app_data(web::Data::new(config_for(&dir)))
                .configure(routes),
        )
        .await;

        let resp = call_service(&app, TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        let body = read_body(resp).await;
        assert_eq!(&body[..], b"<html>duck</html>");
    }

    #[actix_web::test]
    async fn test_serves_wasm_bundle() {
        let dir = web_root();
        let app = init_service(
            App::new()
                .app_data(web::Data::new(config_for(&dir)))
                .configure(routes),
        )
        .await;

        let req = TestRequest::get()
            .uri("/pkg/duck_hunt_bg.wasm")
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/wasm"
        );

        // Directories fall back to their index
        std::fs::write(dir.path().join("web").join("pkg").join("index.html"), "pkg").unwrap();
        let req = TestRequest::get().uri("/pkg").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_missing_and_escaping_paths_are_404() {
        let dir = web_root();
        let app = init_service(
            App::new()
                .app_data(web::Data::new(config_for(&dir)))
                .configure(routes),
        )
        .await;

        let req = TestRequest::get().uri("/nope.js").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = TestRequest::get().uri("/../secret.txt").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_post_not_routed() {
        let dir = web_root();
        let app = init_service(
            App::new()
                .app_data(web::Data::new(config_for(&dir)))
                .configure(routes),
        )
        .await;

        let req = TestRequest::post().uri("/").to_request();
        let resp = call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }

    #[actix_web::test]
    async fn test_run_requires_root_dir() {
        let config = ServerConfig {
            root: PathBuf::from("/definitely/not/a/web/root"),
            ..Default::default()
        };
        assert!(matches!(run(config).await, Err(ServerError::MissingRoot(_))));
    }
}
