/// Voxelize Web - WASM bindings behind the browser front end
///
/// The page in `www/` handles the upload widget, sidebar controls and
/// plotly rendering; every computation goes through a `VoxelizeSession`.

use wasm_bindgen::prelude::*;
use web_sys::console;

use voxelize_core::{
    Axis, ColorMode, ColorScheme, FillMode, MarkerSize, Opacity, Resolution, Session,
    SliceParams, Upload, ViewParams, VoxelizeError,
};

/// Report an error to the console and hand it to JavaScript as an exception
fn js_error(e: VoxelizeError) -> JsValue {
    let message = e.to_string();
    console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn load_summary(name: &str, session: &Session) -> String {
    let [nx, ny, nz] = session.grid().shape();
    format!(
        "{}: {} voxels in a {}x{}x{} grid",
        name,
        session.grid().filled_count(),
        nx,
        ny,
        nz
    )
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error(e.into()))
}

#[wasm_bindgen]
#[derive(Default)]
pub struct VoxelizeSession {
    session: Option<Session>,
}

#[wasm_bindgen]
impl VoxelizeSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> VoxelizeSession {
        VoxelizeSession::default()
    }

    /// Load an uploaded STL file and voxelize it. A failure leaves no session behind.
    pub fn load(&mut self, name: &str, bytes: &[u8], resolution: u32, fill: &str) -> Result<(), JsValue> {
        self.session = None;
        let resolution = Resolution::new(resolution).map_err(js_error)?;
        let fill: FillMode = fill.parse().map_err(js_error)?;
        let upload = Upload::new(name, bytes.to_vec());
        let session = Session::open(&upload, resolution, fill).map_err(js_error)?;
        console::log_1(&JsValue::from_str(&load_summary(name, &session)));
        self.session = Some(session);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    /// Recompute the grid after the resolution slider moved
    pub fn set_resolution(&mut self, resolution: u32, fill: &str) -> Result<(), JsValue> {
        let resolution = Resolution::new(resolution).map_err(js_error)?;
        let fill: FillMode = fill.parse().map_err(js_error)?;
        self.session_mut()?.revoxelize(resolution, fill).map_err(js_error)
    }

    pub fn info_json(&self) -> Result<String, JsValue> {
        to_json(&self.session()?.report())
    }

    pub fn scatter_json(
        &self,
        color_scheme: &str,
        color_mode: &str,
        marker_size: u32,
        opacity: f64,
    ) -> Result<String, JsValue> {
        let params = ViewParams {
            color_scheme: color_scheme.parse().map_err(js_error)?,
            color_mode: color_mode.parse().map_err(js_error)?,
            opacity: Opacity::new(opacity).map_err(js_error)?,
            marker_size: MarkerSize::new(marker_size).map_err(js_error)?,
        };
        let figure = self.session()?.scatter(&params).map_err(js_error)?;
        figure.to_json().map_err(js_error)
    }

    pub fn slice_json(&self, axis: &str, index: Option<usize>, color_scheme: &str) -> Result<String, JsValue> {
        let params = SliceParams {
            axis: axis.parse().map_err(js_error)?,
            index,
            color_scheme: color_scheme.parse().map_err(js_error)?,
        };
        let figure = self.session()?.heatmap(&params).map_err(js_error)?;
        figure.to_json().map_err(js_error)
    }

    /// Upper bound of the slice slider
    pub fn slice_max_index(&self, axis: &str) -> Result<Option<usize>, JsValue> {
        let axis: Axis = axis.parse().map_err(js_error)?;
        Ok(self.session()?.max_slice_index(axis))
    }

    pub fn export_npy(&self) -> Result<Vec<u8>, JsValue> {
        self.session()?.export_npy().map_err(js_error)
    }

    pub fn export_csv(&self) -> Result<String, JsValue> {
        self.session()?.export_csv().map_err(js_error)
    }

    pub fn voxels_file_name(&self) -> Result<String, JsValue> {
        Ok(self.session()?.voxels_file_name())
    }

    pub fn coordinates_file_name(&self) -> Result<String, JsValue> {
        Ok(self.session()?.coordinates_file_name())
    }
}

impl VoxelizeSession {
    fn session(&self) -> Result<&Session, JsValue> {
        self.session
            .as_ref()
            .ok_or_else(|| JsValue::from_str("Upload an STL file to get started!"))
    }

    fn session_mut(&mut self) -> Result<&mut Session, JsValue> {
        self.session
            .as_mut()
            .ok_or_else(|| JsValue::from_str("Upload an STL file to get started!"))
    }
}

/// Names for the color scheme selects
#[wasm_bindgen]
pub fn color_schemes_json() -> Result<String, JsValue> {
    let names: Vec<&str> = ColorScheme::ALL.iter().map(|s| s.name()).collect();
    to_json(&names)
}

/// Labels for the color mapping select
#[wasm_bindgen]
pub fn color_modes_json() -> Result<String, JsValue> {
    let labels: Vec<&str> = ColorMode::ALL.iter().map(|m| m.label()).collect();
    to_json(&labels)
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console::log_1(&JsValue::from_str("voxelize ready"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelize_core::Mesh;

    #[test]
    fn test_lists_match_core() {
        assert_eq!(ColorScheme::ALL.len(), 36);
        assert_eq!(ColorMode::ALL.len(), 6);
        assert!(!VoxelizeSession::new().is_loaded());
    }

    #[test]
    fn test_load_summary() {
        let session =
            Session::from_mesh("cube", Mesh::cube(1.0), Resolution::new(10).unwrap(), FillMode::Surface).unwrap();
        let [nx, ny, nz] = session.grid().shape();
        let summary = load_summary("cube.stl", &session);
        assert_eq!(
            summary,
            format!("cube.stl: {} voxels in a {}x{}x{} grid", session.grid().filled_count(), nx, ny, nz)
        );
    }
}
