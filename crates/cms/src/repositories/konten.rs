//! Static-content repository (FAQ, tips, templates, guides, site settings).

use std::sync::Arc;

use puspresma_common::AppResult;

use crate::client::CmsClient;
use crate::query::Query;
use crate::records::{FaqRecord, PanduanRecord, SiteSettingsRecord, TemplateRecord, TipsRecord};

/// Repository for the content collections. Fallback payloads for absent
/// collections live in the content service, not here.
#[derive(Clone)]
pub struct KontenRepository {
    client: Arc<CmsClient>,
}

impl KontenRepository {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    /// FAQ entries in display order.
    pub async fn list_faq(&self) -> AppResult<Vec<FaqRecord>> {
        let (rows, _) = self
            .client
            .list_items("faq", &Query::new().sort("urutan"))
            .await?;
        Ok(rows)
    }

    /// Tip articles.
    pub async fn list_tips(&self) -> AppResult<Vec<TipsRecord>> {
        let (rows, _) = self.client.list_items("tips", &Query::new()).await?;
        Ok(rows)
    }

    /// Downloadable document templates.
    pub async fn list_templates(&self) -> AppResult<Vec<TemplateRecord>> {
        let (rows, _) = self
            .client
            .list_items("template_dokumen", &Query::new())
            .await?;
        Ok(rows)
    }

    /// Guide pages in display order.
    pub async fn list_panduan(&self) -> AppResult<Vec<PanduanRecord>> {
        let (rows, _) = self
            .client
            .list_items("panduan", &Query::new().sort("urutan"))
            .await?;
        Ok(rows)
    }

    /// Site-wide settings singleton.
    pub async fn get_site_settings(&self) -> AppResult<Option<SiteSettingsRecord>> {
        self.client.get_singleton("site_settings").await
    }
}
