/// Errors raised at the edges of the graph view: data parsing, surface setup and image export.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	/// Graph JSON could not be decoded.
	#[error("failed to parse graph data: {0}")]
	Parse(#[from] serde_json::Error),
	/// The raster backing store could not be allocated.
	#[error("failed to allocate a {width}x{height} raster surface")]
	SurfaceAlloc {
		width: u32,
		height: u32,
	},
	/// The canvas refused to hand out a 2D context.
	#[error("canvas 2d context unavailable: {0}")]
	CanvasContext(String),
	/// The canvas refused to serialise itself.
	#[error("canvas export failed: {0}")]
	CanvasExport(String),
	/// The canvas returned something other than a base64 PNG data URL.
	#[error("canvas export returned an unexpected data URL")]
	DataUrl,
	/// The data URL payload was not valid base64.
	#[error(transparent)]
	Base64(#[from] base64::DecodeError),
	/// PNG encoding of the raster failed.
	#[error("failed to encode PNG")]
	PngEncode,
}

/// Result alias for fallible graph view operations.
pub type Result<T> = std::result::Result<T, GraphError>;
