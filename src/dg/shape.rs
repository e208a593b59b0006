use crate::TypeKey;

/// Reference shape of a discontinuous Galerkin cell kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    Vertex,
    Edge,
    Triangle,
    Quadrilateral,
    Tetrahedron,
    Pyramid,
    Wedge,
    Hexahedron,
}

const VERTEX: [[f64; 3]; 1] = [[0., 0., 0.]];

const EDGE: [[f64; 3]; 2] = [[-1., 0., 0.], [1., 0., 0.]];

const TRIANGLE: [[f64; 3]; 3] = [[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]];

const QUADRILATERAL: [[f64; 3]; 4] = [[-1., -1., 0.], [1., -1., 0.], [1., 1., 0.], [-1., 1., 0.]];

const TETRAHEDRON: [[f64; 3]; 4] = [[0., 0., 0.], [1., 0., 0.], [0., 1., 0.], [0., 0., 1.]];

const PYRAMID: [[f64; 3]; 5] = [
    [-1., -1., -1.],
    [1., -1., -1.],
    [1., 1., -1.],
    [-1., 1., -1.],
    [0., 0., 1.],
];

const WEDGE: [[f64; 3]; 6] = [
    [0., 0., -1.],
    [1., 0., -1.],
    [0., 1., -1.],
    [0., 0., 1.],
    [1., 0., 1.],
    [0., 1., 1.],
];

const HEXAHEDRON: [[f64; 3]; 8] = [
    [-1., -1., -1.],
    [1., -1., -1.],
    [1., 1., -1.],
    [-1., 1., -1.],
    [-1., -1., 1.],
    [1., -1., 1.],
    [1., 1., 1.],
    [-1., 1., 1.],
];

impl Shape {
    pub const ALL: [Shape; 8] = [
        Shape::Vertex,
        Shape::Edge,
        Shape::Triangle,
        Shape::Quadrilateral,
        Shape::Tetrahedron,
        Shape::Pyramid,
        Shape::Wedge,
        Shape::Hexahedron,
    ];

    /// the name the cell kind of this shape is registered under
    pub const fn name(self) -> &'static str {
        match self {
            Shape::Vertex => "vtkDGVert",
            Shape::Edge => "vtkDGEdge",
            Shape::Triangle => "vtkDGTri",
            Shape::Quadrilateral => "vtkDGQuad",
            Shape::Tetrahedron => "vtkDGTet",
            Shape::Pyramid => "vtkDGPyr",
            Shape::Wedge => "vtkDGWdg",
            Shape::Hexahedron => "vtkDGHex",
        }
    }

    pub const fn type_key(self) -> TypeKey {
        TypeKey::from_name(self.name())
    }

    pub fn from_key(key: TypeKey) -> Option<Shape> {
        Shape::ALL.into_iter().find(|shape| shape.type_key() == key)
    }

    /// parametric dimension
    pub const fn dimension(self) -> usize {
        match self {
            Shape::Vertex => 0,
            Shape::Edge => 1,
            Shape::Triangle | Shape::Quadrilateral => 2,
            Shape::Tetrahedron | Shape::Pyramid | Shape::Wedge | Shape::Hexahedron => 3,
        }
    }

    /// parametric coordinates of the corners, in the usual vtk corner order
    pub const fn corners(self) -> &'static [[f64; 3]] {
        match self {
            Shape::Vertex => &VERTEX,
            Shape::Edge => &EDGE,
            Shape::Triangle => &TRIANGLE,
            Shape::Quadrilateral => &QUADRILATERAL,
            Shape::Tetrahedron => &TETRAHEDRON,
            Shape::Pyramid => &PYRAMID,
            Shape::Wedge => &WEDGE,
            Shape::Hexahedron => &HEXAHEDRON,
        }
    }

    /// parametric center, the default evaluation point
    pub const fn center(self) -> [f64; 3] {
        const THIRD: f64 = 1. / 3.;

        match self {
            Shape::Vertex | Shape::Edge | Shape::Quadrilateral | Shape::Hexahedron => [0., 0., 0.],
            Shape::Triangle | Shape::Wedge => [THIRD, THIRD, 0.],
            Shape::Tetrahedron => [0.25, 0.25, 0.25],
            Shape::Pyramid => [0., 0., -0.5],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for shape in Shape::ALL {
            assert_eq!(Shape::from_key(shape.type_key()), Some(shape));
            assert_eq!(Shape::from_key(TypeKey::hashed(shape.name())), Some(shape));
        }
        assert_eq!(Shape::from_key(TypeKey::from_name("vtkDGCell")), None);
    }

    #[test]
    fn corners_match_dimension() {
        for shape in Shape::ALL {
            let dim = shape.dimension();
            for corner in shape.corners() {
                assert!(corner[dim..].iter().all(|x| *x == 0.), "{shape:?}");
            }
        }
        assert_eq!(Shape::Hexahedron.corners().len(), 8);
        assert_eq!(Shape::Pyramid.corners().len(), 5);
    }
}
