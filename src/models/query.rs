use chrono::Month;

/// Per-request context for a single crop. Everything but the crop name is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PestQuery {
    pub crop_name: String,
    pub district: Option<String>,
    pub taluk: Option<String>,
    pub soil_type: Option<String>,
    pub stage: Option<String>,
    pub temperature_c: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub rainfall_mm: Option<f64>,
    /// Defaults to the current calendar month when absent
    pub month: Option<Month>,
    /// Free-text symptom report from the farmer
    pub symptoms_text: Option<String>,
    pub language: Option<String>,
}

impl PestQuery {
    pub fn new(crop_name: impl Into<String>) -> Self {
        Self {
            crop_name: crop_name.into(),
            ..Default::default()
        }
    }

    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    pub fn with_taluk(mut self, taluk: impl Into<String>) -> Self {
        self.taluk = Some(taluk.into());
        self
    }

    pub fn with_soil_type(mut self, soil_type: impl Into<String>) -> Self {
        self.soil_type = Some(soil_type.into());
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature_c = Some(celsius);
        self
    }

    pub fn with_humidity(mut self, percent: f64) -> Self {
        self.humidity_percent = Some(percent);
        self
    }

    pub fn with_rainfall(mut self, mm: f64) -> Self {
        self.rainfall_mm = Some(mm);
        self
    }

    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_symptoms(mut self, text: impl Into<String>) -> Self {
        self.symptoms_text = Some(text.into());
        self
    }

    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.language = Some(lang.into());
        self
    }

    /// Same field conditions, different crop
    pub fn for_crop(&self, crop_name: impl Into<String>, stage: Option<String>) -> Self {
        Self {
            crop_name: crop_name.into(),
            stage,
            ..self.clone()
        }
    }
}
