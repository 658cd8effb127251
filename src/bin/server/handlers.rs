use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use drugsmiles::pubchem::CompoundSource;
use log::{debug, error, info};

use crate::{
    templates::{Index, Results},
    AppState,
};

type HandlerResult = Result<Html<String>, (StatusCode, String)>;

fn render(t: impl Template) -> HandlerResult {
    t.render().map(Html).map_err(|e| {
        error!("failed to render template: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

pub(crate) async fn index<S>(
    State(state): State<Arc<AppState<S>>>,
) -> HandlerResult {
    render(Index {
        output: state.config.output.clone(),
    })
}

/// run the pipeline on the uploaded `file` field and show the results
pub(crate) async fn process<S>(
    State(state): State<Arc<AppState<S>>>,
    mut multipart: Multipart,
) -> HandlerResult
where
    S: CompoundSource + Send + Sync,
{
    let output = &state.config.output;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() == Some("file") {
            debug!("received {:?}", field.file_name());
            upload = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
            );
        }
    }
    let Some(bytes) = upload else {
        return render(Results::failed("no file was uploaded", output));
    };

    let report = match state.pipeline.run(&bytes, |_| {}).await {
        Ok(report) => report,
        Err(e) => {
            info!("run failed: {e}");
            return render(Results::failed(e, output));
        }
    };
    let csv = match report.to_csv() {
        Ok(csv) => csv,
        Err(e) => return render(Results::failed(e, output)),
    };

    render(Results {
        download: Some(state.store(csv)),
        rows: report.rows,
        warnings: report.warnings,
        processed: report.processed,
        error: None,
        output: output.clone(),
    })
}

pub(crate) async fn download<S>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<usize>,
) -> Response {
    let Some(csv) = state.report(id) else {
        return (StatusCode::NOT_FOUND, "no such report").into_response();
    };
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", state.config.output),
            ),
        ],
        csv,
    )
        .into_response()
}
