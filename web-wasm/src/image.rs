//! ブラウザで選択された画像ファイル

use gloo::console;
use meal_ai_common::UploadSource;
use wasm_bindgen::prelude::*;
use web_sys::{File, FileReader, ProgressEvent};

#[derive(Debug, Clone)]
pub struct WebImage {
    file: File,
    name: String,
    mime_type: String,
    size: u64,
}

impl WebImage {
    pub fn new(file: File) -> Self {
        Self {
            name: file.name(),
            mime_type: file.type_(),
            size: file.size() as u64,
            file,
        }
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl UploadSource for WebImage {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn read_preview<F>(&self, on_ready: F)
    where
        F: FnOnce(String) + 'static,
    {
        let reader = match FileReader::new() {
            Ok(reader) => reader,
            Err(e) => {
                console::error!("FileReader作成失敗", e);
                return;
            }
        };

        let reader_clone = reader.clone();
        let closure = Closure::once(move |_: ProgressEvent| {
            match reader_clone.result().ok().and_then(|r| r.as_string()) {
                Some(data_url) => on_ready(data_url),
                None => console::warn!("プレビューを読み込めませんでした"),
            }
        });

        reader.set_onloadend(Some(closure.as_ref().unchecked_ref()));
        closure.forget();

        if let Err(e) = reader.read_as_data_url(&self.file) {
            console::error!("プレビュー読み込み失敗", e);
        }
    }
}
