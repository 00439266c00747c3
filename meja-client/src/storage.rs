//! 本地存储
//!
//! 每个 slot 对应存储目录下的一个 JSON 文件 (`<slot>.json`)。
//! 写入先落到临时文件再 rename，中途崩溃不会留下半个文件。

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ClientResult;

/// 顾客购物车
pub const CART_SLOT: &str = "cart-storage";

/// 管理员会话
pub const ADMIN_SLOT: &str = "admin-storage";

/// 目录下的具名 JSON slot
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    /// 打开存储目录 (不存在时创建)
    pub fn open(dir: impl Into<PathBuf>) -> ClientResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slot))
    }

    /// 保存
    pub fn save<T: Serialize>(&self, slot: &str, value: &T) -> ClientResult<()> {
        let json = serde_json::to_vec_pretty(value)?;
        let path = self.slot_path(slot);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// 加载，slot 不存在时返回 `None`
    pub fn load<T: DeserializeOwned>(&self, slot: &str) -> ClientResult<Option<T>> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    pub fn exists(&self, slot: &str) -> bool {
        self.slot_path(slot).exists()
    }

    /// 删除
    pub fn delete(&self, slot: &str) -> ClientResult<()> {
        let path = self.slot_path(slot);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// 获取目录
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
