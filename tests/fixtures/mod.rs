// 統合テスト用のヘルパー
// 画像データの生成と、画像APIを模したHTTPサーバー

#![allow(dead_code)]

use edge_pipeline::{
    codec::standard::StandardImageCodec,
    engine::ProcessingEngine,
    fetcher::http::HttpImageFetcher,
    image_source::dog_api::DogApiClient,
    services::{DefaultProcessingConfig, NoOpProgressReporter},
    storage::local::LocalStorageBackend,
};
use image::{Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub type HttpEngine = ProcessingEngine<
    DogApiClient,
    HttpImageFetcher,
    StandardImageCodec,
    LocalStorageBackend,
    DefaultProcessingConfig,
    NoOpProgressReporter,
>;

/// 左半分が黒、右半分が白のPNG画像
pub fn step_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)
        .expect("Failed to encode test PNG");
    buffer.into_inner()
}

/// 画像APIのモックサーバー
///
/// `ids` の各画像を `/images/{id}.png` で配信し、`missing` に含まれる
/// ものは 404 を返す。検索エンドポイントは全IDの一覧を返す。
pub async fn start_image_server(ids: &[&str], missing: &[&str]) -> MockServer {
    let server = MockServer::start().await;

    let listing: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "url": format!("{}/images/{id}.png", server.uri()),
                "width": 16,
                "height": 8,
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/v1/images/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .mount(&server)
        .await;

    for id in ids {
        let response = if missing.contains(id) {
            ResponseTemplate::new(404)
        } else {
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(step_png(16, 8))
        };
        Mock::given(method("GET"))
            .and(path(format!("/images/{id}.png")))
            .respond_with(response)
            .mount(&server)
            .await;
    }

    server
}

/// モックサーバーに向けた実HTTP構成のエンジン
pub fn http_engine(base_url: &str, output_dir: &Path, batch_size: usize, workers: usize) -> HttpEngine {
    let client = reqwest::Client::new();
    ProcessingEngine::new(
        DogApiClient::new(client.clone(), base_url, None),
        HttpImageFetcher::new(client),
        StandardImageCodec::new(),
        LocalStorageBackend::new(),
        DefaultProcessingConfig::new(1)
            .with_batch_size(batch_size)
            .with_max_concurrent(workers)
            .with_output_dir(output_dir),
        NoOpProgressReporter::new(),
    )
}

/// 出力ディレクトリ内のファイル名一覧（ソート済み）
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// ワーカー番号を除いたファイル名（`{id}_{kind}.{ext}`）
pub fn strip_worker_prefix(name: &str) -> String {
    name.split_once('_')
        .map(|(_, rest)| rest.to_string())
        .unwrap_or_else(|| name.to_string())
}
