use super::*;

/// `google.protobuf.FieldMask`
///
/// A set of snake_case field paths. The JSON form is a single string of
/// comma-joined camelCase paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldMask {
    pub paths: Vec<String>,
}

impl Message for FieldMask {
    const NAME: &'static str = "google.protobuf.FieldMask";

    fn default_value() -> FieldMask {
        FieldMask::default()
    }

    fn encode_fields(&self, w: &mut Writer) {
        encode::repeated::<scalar::Str>(w, 1, &self.paths, false);
    }

    fn decode_fields(
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<FieldMask, DecodeError> {
        let mut paths = sentinel::repeated::<scalar::Str>(1);
        decode::run(reader, ctx, &mut [&mut paths])?;
        Ok(FieldMask {
            paths: paths.finish(),
        })
    }

    fn json_fields(&self, opts: &JsonOptions) -> Map<String, Json> {
        let mut obj = Map::new();
        json::ser::emit_repeated::<scalar::Str>(&mut obj, "paths", "paths", &self.paths, opts);
        obj
    }

    fn from_json_fields(obj: &Map<String, Json>) -> Result<FieldMask, DecodeError> {
        Ok(FieldMask {
            paths: json::de::parse_repeated::<scalar::Str>(obj, "paths", "paths")?,
        })
    }

    fn merge_from(&mut self, other: FieldMask) {
        merge::repeated(&mut self.paths, other.paths);
    }
}
