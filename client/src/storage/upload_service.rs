use lazy_static::lazy_static;
use regex::Regex;
use shared::{
    DiseaseIdentification, DiseasePredictions, PipelineStage, PlantIdentification,
    PlantPredictResponse, StorageKey, UploadResult,
};

use super::{ImageFile, extract_storage_key};
use crate::disease::DiseaseService;
use crate::disease::normalize::normalize_predictions;
use crate::error::ApiError;
use crate::fields::{first_string, key, record_list, to_count};
use crate::http::{ApiClient, HttpResponse, QueryParams};
use crate::plant::normalize::normalize_plant_prediction;

pub const DEFAULT_PREDICT_COUNT: u32 = 8;
const FILE_FIELD: &str = "file";

lazy_static! {
    static ref NO_MATCH: Regex = Regex::new(r"(?i)no matching").unwrap();
}

/// Upload + predict pipelines for plant and disease images.
#[derive(Clone)]
pub struct UploadService {
    client: ApiClient,
    diseases: DiseaseService,
}

impl UploadService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            diseases: DiseaseService::new(client.clone()),
            client,
        }
    }

    async fn upload(
        &self,
        endpoint: &str,
        query: &QueryParams,
        file: &ImageFile,
    ) -> Result<UploadResult, ApiError> {
        file.validate(self.client.config().max_upload_bytes)?;

        let url = self.client.config().api_url(endpoint);
        let response = self
            .client
            .post_multipart(&url, query, file.to_part(FILE_FIELD))
            .await?;
        let data = ApiClient::read_success(response)?;
        let storage_key = extract_storage_key(&data).ok_or(ApiError::MissingStorageKey)?;

        log::debug!("Uploaded {} ({} bytes) as {}", file.file_name, file.bytes.len(), storage_key);
        Ok(UploadResult {
            storage_key,
            url: first_string(&data, &[key("url"), key("s3Uri")]),
        })
    }

    pub async fn upload_plant_image(&self, file: &ImageFile) -> Result<UploadResult, ApiError> {
        let query = QueryParams::new().set("filename", &file.file_name);
        self.upload("upload", &query, file).await
    }

    pub async fn upload_disease_image(&self, file: &ImageFile) -> Result<UploadResult, ApiError> {
        self.upload("upload-D", &QueryParams::new(), file).await
    }

    /// Ranked plant candidates for an uploaded image.
    pub async fn predict_plants(
        &self,
        storage_key: &StorageKey,
        count: u32,
    ) -> Result<PlantPredictResponse, ApiError> {
        let params = QueryParams::new()
            .set("s3_key", storage_key.as_str())
            .set("count", count);
        let data = self
            .client
            .get(&self.client.config().api_url("predict"), &params)
            .await?;

        let results = record_list(&data, &[key("results"), key("predictions"), key("items")])
            .iter()
            .filter_map(normalize_plant_prediction)
            .collect();
        Ok(PlantPredictResponse {
            s3_key: first_string(&data, &[key("s3_key")])
                .unwrap_or_else(|| storage_key.to_string()),
            count: data
                .get("count")
                .and_then(to_count)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(count),
            results,
        })
    }

    /// Ranked disease candidates for an uploaded image.
    ///
    /// A 404 or 422, or an error message containing "no matching", is an empty
    /// result rather than an error.
    pub async fn predict_diseases(
        &self,
        storage_key: &StorageKey,
        count: u32,
    ) -> Result<DiseasePredictions, ApiError> {
        let params = QueryParams::new()
            .set("s3_key", storage_key.as_str())
            .set("count", count);
        let response = self
            .client
            .get_raw(&self.client.config().api_url("disease-query"), &params)
            .await?;

        if !response.is_success() {
            if is_no_match(&response) {
                log::info!(
                    "No matching disease for {} (HTTP {})",
                    storage_key,
                    response.status
                );
                return Ok(DiseasePredictions::empty());
            }
            return Err(response.into_status_error());
        }

        let data = ApiClient::read_success(response)?;
        Ok(DiseasePredictions {
            predictions: normalize_predictions(&record_list(&data, &[key("results")])),
            total: data.get("total").and_then(to_count),
        })
    }

    /// Validate, upload, then predict. Errors are tagged with the stage that failed.
    pub async fn identify_plant(
        &self,
        file: &ImageFile,
        count: u32,
    ) -> Result<PlantIdentification, ApiError> {
        log::info!("{}: {}", PipelineStage::Uploading, file.file_name);
        let upload = self
            .upload_plant_image(file)
            .await
            .map_err(|e| e.at_stage(PipelineStage::Uploading))?;

        log::info!("{}: {}", PipelineStage::Predicting, upload.storage_key);
        let prediction = self
            .predict_plants(&upload.storage_key, count)
            .await
            .map_err(|e| e.at_stage(PipelineStage::Predicting))?;

        log::info!(
            "{}: {} plant candidates",
            PipelineStage::Done,
            prediction.results.len()
        );
        Ok(PlantIdentification { upload, prediction })
    }

    /// Disease pipeline, with every predicted disease expanded to its full record.
    pub async fn identify_disease(
        &self,
        file: &ImageFile,
        count: u32,
    ) -> Result<DiseaseIdentification, ApiError> {
        log::info!("{}: {}", PipelineStage::Uploading, file.file_name);
        let upload = self
            .upload_disease_image(file)
            .await
            .map_err(|e| e.at_stage(PipelineStage::Uploading))?;

        log::info!("{}: {}", PipelineStage::Predicting, upload.storage_key);
        let predictions = self
            .predict_diseases(&upload.storage_key, count)
            .await
            .map_err(|e| e.at_stage(PipelineStage::Predicting))?;
        let diseases = self.diseases.expand(&predictions.predictions).await;

        log::info!(
            "{}: {} of {} predicted diseases resolved",
            PipelineStage::Done,
            diseases.len(),
            predictions.predictions.len()
        );
        Ok(DiseaseIdentification {
            upload,
            predictions,
            diseases,
        })
    }
}

fn is_no_match(response: &HttpResponse) -> bool {
    matches!(response.status, 404 | 422)
        || response
            .error_message()
            .is_some_and(|message| NO_MATCH.is_match(&message))
}
