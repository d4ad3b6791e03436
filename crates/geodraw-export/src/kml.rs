use geodraw_core::{Geometry, Shape};
use geodraw_geometry::LatLng;

/// Export shapes as a minimal KML document.
///
/// KML has no circle primitive, so circles are written as their center point
/// and the radius is dropped.
pub fn export_kml(shapes: &[Shape]) -> String {
    let mut kml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Exported Shapes</name>
"#,
    );

    for shape in shapes {
        kml.push_str("    <Placemark>\n");
        kml.push_str(&format!("      <name>{}</name>\n", escape(&shape.name)));
        kml.push_str(&format!(
            "      <description>{} - Area: {} sq m</description>\n",
            shape.kind(),
            shape.area().round()
        ));

        match shape.geometry() {
            Geometry::Polygon { coordinates } => {
                let ring: Vec<String> = coordinates
                    .iter()
                    .chain(coordinates.first())
                    .map(triple)
                    .collect();
                kml.push_str(&format!(
                    r#"      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>{}</coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
"#,
                    ring.join(" ")
                ));
            }
            Geometry::Circle { center, .. } => {
                kml.push_str(&format!(
                    r#"      <Point>
        <coordinates>{}</coordinates>
      </Point>
"#,
                    triple(center)
                ));
            }
        }

        kml.push_str("    </Placemark>\n");
    }

    kml.push_str("  </Document>\n</kml>");
    kml
}

/// `lng,lat,0`
fn triple(p: &LatLng) -> String {
    format!("{},{},0", p.lng, p.lat)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document() {
        let kml = export_kml(&[]);
        assert!(kml.starts_with("<?xml"));
        assert!(kml.contains("<Document>"));
        assert!(!kml.contains("<Placemark>"));
        assert!(kml.ends_with("</kml>"));
    }

    #[test]
    fn polygon_placemark_has_closed_ring() {
        let shape = Shape::polygon(
            "A & B",
            vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(0.0, 1.0),
                LatLng::new(1.0, 1.0),
            ],
        );
        let kml = export_kml(&[shape]);

        assert!(kml.contains("<name>A &amp; B</name>"));
        assert!(kml.contains("<description>polygon - Area: "));
        assert!(kml.contains("<coordinates>0,0,0 1,0,0 1,1,0 0,0,0</coordinates>"));
        assert!(kml.contains("<outerBoundaryIs>"));
    }

    #[test]
    fn circle_becomes_center_point() {
        let shape = Shape::circle("Well", LatLng::new(10.5, 20.25), 100.0);
        let kml = export_kml(&[shape]);

        assert!(kml.contains("<Point>"));
        assert!(kml.contains("<coordinates>20.25,10.5,0</coordinates>"));
        assert!(kml.contains("circle - Area: 31416 sq m"));
        assert!(!kml.contains("100"));
    }
}
