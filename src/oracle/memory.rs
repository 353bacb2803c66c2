// In-memory type oracle
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of uibinder.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! In-memory [`TypeOracle`].

use super::{ClassType, TypeOracle};
use fxhash::{FxHashMap, FxHashSet};

/// A [`TypeOracle`] populated directly with [`ClassType`] descriptors.
///
/// Types are enumerated in the order in which they were added,
///   which keeps tag name resolution deterministic.
#[derive(Debug, Default)]
pub struct MemoryTypeOracle {
    types: Vec<ClassType>,
    index: FxHashMap<String, usize>,
    packages: FxHashSet<String>,
}

impl MemoryTypeOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type to the oracle,
    ///   replacing any previous type of the same name.
    pub fn add(&mut self, ty: ClassType) -> &mut Self {
        let name = ty.name();

        self.packages.insert(ty.package.clone());

        match self.index.get(&name) {
            Some(&i) => self.types[i] = ty,
            None => {
                self.index.insert(name, self.types.len());
                self.types.push(ty);
            }
        }

        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<ClassType> for MemoryTypeOracle {
    fn from_iter<I: IntoIterator<Item = ClassType>>(iter: I) -> Self {
        let mut oracle = Self::new();
        iter.into_iter().for_each(|ty| {
            oracle.add(ty);
        });
        oracle
    }
}

impl TypeOracle for MemoryTypeOracle {
    fn find_type(&self, name: &str) -> Option<&ClassType> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    fn find_package(&self, name: &str) -> bool {
        self.packages.contains(name)
    }

    fn types(&self) -> Box<dyn Iterator<Item = &ClassType> + '_> {
        Box::new(self.types.iter())
    }
}
