use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use configs::AppConfig;
use reqwest::{multipart, StatusCode as HttpStatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    root: PathBuf,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn data_file(&self, name: &str) -> PathBuf {
        self.root.join("data").join(name)
    }
}

fn test_config(root: &Path, max_upload_bytes: usize) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.storage.max_upload_bytes = max_upload_bytes;
    cfg.server.host = "127.0.0.1".into();
    cfg.storage.data_dir = root.join("data").to_string_lossy().into_owned();
    cfg.storage.upload_dir = root.join("uploads").to_string_lossy().into_owned();
    cfg.storage.frontend_dir = root.join("dist").to_string_lossy().into_owned();
    cfg
}

/// Serve the app over a fresh listener, reusing `root` for all on-disk state.
async fn start_server_with(root: PathBuf, max_upload_bytes: usize) -> anyhow::Result<TestApp> {
    let app = server::build_app(&test_config(&root, max_upload_bytes)).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, root })
}

async fn start_server_at(root: PathBuf) -> anyhow::Result<TestApp> {
    start_server_with(root, configs::DEFAULT_MAX_UPLOAD_BYTES).await
}

fn temp_root() -> PathBuf {
    std::env::temp_dir().join(format!("menu_e2e_{}", Uuid::new_v4()))
}

async fn start_server() -> anyhow::Result<TestApp> {
    start_server_at(temp_root()).await
}

async fn get_json(c: &reqwest::Client, url: String) -> anyhow::Result<Value> {
    Ok(c.get(url).send().await?.json::<Value>().await?)
}

async fn read_json(path: PathBuf) -> anyhow::Result<Value> {
    Ok(serde_json::from_slice(&tokio::fs::read(path).await?)?)
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn health_and_init() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.get(app.url("/health")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["status"], "ok");

    let res = c.post(app.url("/api/init")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "success": true, "message": "Data initialized" }));
    Ok(())
}

#[tokio::test]
async fn menu_is_seeded_and_replaced_wholesale() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let menu = c.get(app.url("/api/menu")).send().await?.json::<Value>().await?;
    assert_eq!(menu["categories"].as_array().map(Vec::len), Some(3));
    assert_eq!(menu["dishes"][0]["name"], "宫保鸡丁");
    assert_eq!(menu["dishes"][0]["categoryId"], 1);

    let replacement = json!({
        "categories": [{ "id": 7, "name": "甜品", "description": "饭后甜点" }],
        "dishes": [{
            "id": 70, "categoryId": 7, "name": "双皮奶", "description": "", "image": "/uploads/a.png",
            "customizations": { "sweetness": ["少糖", "正常"] }
        }]
    });
    let res = c.put(app.url("/api/menu")).json(&replacement).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "success": true }));

    let menu = c.get(app.url("/api/menu")).send().await?.json::<Value>().await?;
    assert_eq!(menu, replacement);
    assert_eq!(read_json(app.data_file("menu.json")).await?, replacement);
    Ok(())
}

#[tokio::test]
async fn loose_menu_survives_restart() -> anyhow::Result<()> {
    let root = temp_root();
    let app = start_server_at(root.clone()).await?;
    let c = client();

    let menu = json!({
        "categories": [{ "id": 1, "name": "饮品", "description": null }],
        "dishes": [{
            "id": 11, "categoryId": 1, "name": "奶茶", "image": null, "description": null,
            "customizations": { "sizes": [{ "name": "大", "price": 2 }, { "name": "中", "price": 0 }] }
        }],
        "updatedBy": "admin"
    });
    let res = c.put(app.url("/api/menu")).json(&menu).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let restarted = start_server_at(root).await?;
    assert_eq!(get_json(&c, restarted.url("/api/menu")).await?, menu);
    Ok(())
}

#[tokio::test]
async fn orders_append_and_patch() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let first = c.post(app.url("/api/orders"))
        .json(&json!({ "items": [{ "dishId": 1, "qty": 2 }], "status": "pending", "note": "少辣" }))
        .send().await?.json::<Value>().await?;
    let second = c.post(app.url("/api/orders"))
        .json(&json!({ "items": [], "status": "pending" }))
        .send().await?.json::<Value>().await?;
    let id = first["id"].as_i64().expect("numeric id");
    assert_ne!(first["id"], second["id"]);

    let res = c.put(app.url(&format!("/api/orders/{id}")))
        .json(&json!({ "status": "done" }))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["status"], "done");
    assert_eq!(updated["note"], "少辣");
    assert_eq!(updated["id"], id);

    let list = c.get(app.url("/api/orders")).send().await?.json::<Value>().await?;
    assert_eq!(list, json!([updated, second]));
    assert_eq!(read_json(app.data_file("orders.json")).await?, list);

    let res = c.put(app.url("/api/orders/1")).json(&json!({ "status": "x" })).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.put(app.url("/api/orders/not-a-number")).json(&json!({})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let unchanged = c.get(app.url("/api/orders")).send().await?.json::<Value>().await?;
    assert_eq!(unchanged, list);
    Ok(())
}

#[tokio::test]
async fn reviews_create_and_delete_idempotently() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let review = c.post(app.url("/api/reviews"))
        .json(&json!({ "dishId": 1, "rating": 5, "comment": "好吃" }))
        .send().await?.json::<Value>().await?;
    let id = review["id"].as_i64().expect("numeric id");

    for _ in 0..2 {
        let res = c.delete(app.url(&format!("/api/reviews/{id}"))).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
        assert_eq!(res.json::<Value>().await?, json!({ "success": true }));
    }

    let list = c.get(app.url("/api/reviews")).send().await?.json::<Value>().await?;
    assert_eq!(list, json!([]));
    assert_eq!(read_json(app.data_file("reviews.json")).await?, json!([]));
    Ok(())
}

#[tokio::test]
async fn restaurants_crud() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let created = c.post(app.url("/api/restaurants"))
        .json(&json!({ "name": "金陵小馆", "region": "南京" }))
        .send().await?.json::<Value>().await?;
    let id = created["id"].as_i64().expect("numeric id");

    let updated = c.put(app.url(&format!("/api/restaurants/{id}")))
        .json(&json!({ "phone": "025-000" }))
        .send().await?.json::<Value>().await?;
    assert_eq!(updated["name"], "金陵小馆");
    assert_eq!(updated["phone"], "025-000");

    let res = c.put(app.url("/api/restaurants/12345")).json(&json!({ "name": "x" })).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Not Found");

    let res = c.delete(app.url(&format!("/api/restaurants/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let list = c.get(app.url("/api/restaurants")).send().await?.json::<Value>().await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn regions_follow_insert_only_uniqueness() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    assert_eq!(get_json(&c, app.url("/api/restaurants/regions")).await?, json!(["南京", "杭州"]));

    for _ in 0..2 {
        let res = c.post(app.url("/api/restaurants/regions")).json(&json!({ "name": "上海" })).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
    }
    assert_eq!(
        get_json(&c, app.url("/api/restaurants/regions")).await?,
        json!(["南京", "杭州", "上海"])
    );

    // rename onto an existing name keeps both entries
    let res = c.put(app.url("/api/restaurants/regions/上海"))
        .json(&json!({ "name": "南京" }))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(
        get_json(&c, app.url("/api/restaurants/regions")).await?,
        json!(["南京", "杭州", "南京"])
    );

    let res = c.put(app.url("/api/restaurants/regions/北京"))
        .json(&json!({ "name": "天津" }))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.delete(app.url("/api/restaurants/regions/%E5%8D%97%E4%BA%AC")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.delete(app.url("/api/restaurants/regions/不存在")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    assert_eq!(get_json(&c, app.url("/api/restaurants/regions")).await?, json!(["杭州"]));
    assert_eq!(read_json(app.data_file("regions.json")).await?, json!(["杭州"]));
    Ok(())
}

#[tokio::test]
async fn carts_default_to_empty_list() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let cart = c.get(app.url("/api/cart/user-1")).send().await?.json::<Value>().await?;
    assert_eq!(cart, json!([]));

    let items = json!([{ "dishId": 1, "qty": 1, "options": { "spiciness": "微辣" } }]);
    let res = c.put(app.url("/api/cart/user-1")).json(&items).send().await?;
    assert_eq!(res.json::<Value>().await?, json!({ "success": true }));

    assert_eq!(c.get(app.url("/api/cart/user-1")).send().await?.json::<Value>().await?, items);
    assert_eq!(c.get(app.url("/api/cart/user-2")).send().await?.json::<Value>().await?, json!([]));
    assert_eq!(read_json(app.data_file("carts.json")).await?, json!({ "user-1": items }));
    Ok(())
}

#[tokio::test]
async fn upload_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let png: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];

    let text = multipart::Part::bytes(b"hello".to_vec()).file_name("notes.txt").mime_str("text/plain")?;
    let res = c.post(app.url("/api/upload"))
        .multipart(multipart::Form::new().part("image", text))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let mut entries = tokio::fs::read_dir(app.root.join("uploads")).await?;
    assert!(entries.next_entry().await?.is_none());

    let res = c.post(app.url("/api/upload"))
        .multipart(multipart::Form::new().text("caption", "no file"))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "No file uploaded");

    let image = multipart::Part::bytes(png.clone()).file_name("dish.png").mime_str("image/png")?;
    let res = c.post(app.url("/api/upload"))
        .multipart(multipart::Form::new().part("image", image))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    let filename = body["filename"].as_str().expect("filename").to_string();
    let image_url = body["imageUrl"].as_str().expect("imageUrl").to_string();
    assert!(image_url.starts_with("/uploads/"));
    assert!(filename.starts_with("image-") && filename.ends_with(".png"));

    let served = c.get(app.url(&image_url)).send().await?;
    assert_eq!(served.status(), HttpStatusCode::OK);
    assert_eq!(served.bytes().await?.to_vec(), png);

    let res = c.delete(app.url(&format!("/api/upload/{filename}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "success": true, "message": "File deleted" }));

    let res = c.delete(app.url(&format!("/api/upload/{filename}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn oversize_upload_is_rejected() -> anyhow::Result<()> {
    let app = start_server_with(temp_root(), 1024).await?;
    let c = client();

    let big = vec![0u8; 1025];
    let part = multipart::Part::bytes(big).file_name("huge.png").mime_str("image/png")?;
    let res = c.post(app.url("/api/upload"))
        .multipart(multipart::Form::new().part("image", part))
        .send().await?;
    assert!(res.status().is_client_error(), "got {}", res.status());

    let mut entries = tokio::fs::read_dir(app.root.join("uploads")).await?;
    assert!(entries.next_entry().await?.is_none());
    Ok(())
}

#[tokio::test]
async fn reset_keeps_menu_and_regions() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    c.post(app.url("/api/orders")).json(&json!({ "total": 30 })).send().await?;
    c.post(app.url("/api/reviews")).json(&json!({ "rating": 4 })).send().await?;
    c.post(app.url("/api/restaurants")).json(&json!({ "name": "R" })).send().await?;
    c.put(app.url("/api/cart/u1")).json(&json!([1, 2])).send().await?;
    c.post(app.url("/api/restaurants/regions")).json(&json!({ "name": "成都" })).send().await?;
    let menu_before = c.get(app.url("/api/menu")).send().await?.json::<Value>().await?;

    let res = c.post(app.url("/api/reset")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "success": true, "message": "Data reset" }));

    for path in ["/api/orders", "/api/reviews", "/api/restaurants", "/api/cart/u1"] {
        assert_eq!(c.get(app.url(path)).send().await?.json::<Value>().await?, json!([]), "{path}");
    }
    assert_eq!(read_json(app.data_file("carts.json")).await?, json!({}));
    assert_eq!(c.get(app.url("/api/menu")).send().await?.json::<Value>().await?, menu_before);
    assert_eq!(
        c.get(app.url("/api/restaurants/regions")).send().await?.json::<Value>().await?,
        json!(["南京", "杭州", "成都"])
    );
    Ok(())
}

#[tokio::test]
async fn restart_reloads_persisted_state() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    c.put(app.url("/api/menu")).json(&json!({ "categories": [], "dishes": [] })).send().await?;
    let order = c.post(app.url("/api/orders")).json(&json!({ "total": 12 })).send().await?.json::<Value>().await?;
    c.put(app.url("/api/restaurants/regions/杭州")).json(&json!({ "name": "苏州" })).send().await?;
    c.put(app.url("/api/cart/u7")).json(&json!({ "items": [3] })).send().await?;

    let restarted = start_server_at(app.root.clone()).await?;

    assert_eq!(get_json(&c, restarted.url("/api/menu")).await?, json!({ "categories": [], "dishes": [] }));
    assert_eq!(get_json(&c, restarted.url("/api/orders")).await?, json!([order]));
    assert_eq!(get_json(&c, restarted.url("/api/restaurants/regions")).await?, json!(["南京", "苏州"]));
    assert_eq!(get_json(&c, restarted.url("/api/cart/u7")).await?, json!({ "items": [3] }));
    Ok(())
}

#[tokio::test]
async fn frontend_bundle_serves_spa_routes() -> anyhow::Result<()> {
    let root = temp_root();
    tokio::fs::create_dir_all(root.join("dist")).await?;
    tokio::fs::write(root.join("dist").join("index.html"), "<div id=\"app\"></div>").await?;
    let app = start_server_at(root).await?;

    let res = client().get(app.url("/admin/menu")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "<div id=\"app\"></div>");
    Ok(())
}

#[tokio::test]
async fn graceful_shutdown_stops_accepting() -> anyhow::Result<()> {
    let root = temp_root();
    let app = server::build_app(&test_config(&root, configs::DEFAULT_MAX_UPLOAD_BYTES)).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(server::serve(listener, app, async {
        let _ = stop_rx.await;
    }));

    let c = client();
    let health = get_json(&c, format!("http://{addr}/health")).await?;
    assert_eq!(health["status"], "ok");

    let _ = stop_tx.send(());
    handle.await??;
    assert!(client().get(format!("http://{addr}/health")).send().await.is_err());
    Ok(())
}
