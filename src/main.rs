// Headless check of the bundled artifact: predicts the form's default item once.
use sales_pred::{
    format_sales, init_tracing, load_model, AppConfig, OutletLocationType, OutletSize, OutletType,
    PredictionInput, PredictionService, SessionHistory, CONFIG_FILE_NAME,
};
use tracing::error;

fn main() -> sales_pred::Result<()> {
    init_tracing();

    let config = AppConfig::load_or_default(CONFIG_FILE_NAME)?;
    let model = load_model(&config.artifact_path).inspect_err(|e| error!("{}", e))?;
    let service = PredictionService::new(model);

    let mut history = SessionHistory::new();
    let input = PredictionInput::new(
        config.default_item_weight,
        config.default_item_mrp,
        OutletSize::Small,
        OutletLocationType::Urban,
        OutletType::ConvenienceStore,
    );
    let record = service.record_prediction(&mut history, input)?;
    println!("Input: {:?}", record.input);
    println!("Feature vector: {:?}", record.input.features().values());
    println!("Predicted Value: {}", format_sales(record.sales));
    Ok(())
}
