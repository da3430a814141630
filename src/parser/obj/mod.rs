// Wavefront OBJ: splitting a composite document into named pieces
pub mod segmenter;
